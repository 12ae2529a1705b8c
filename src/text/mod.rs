//! Text feature extraction: tokenization and bag-of-words vectorization.

pub mod stopwords;
pub mod tokenize;
pub mod vectorize;

pub use tokenize::Tokenizer;
pub use vectorize::{CountMatrix, CountVectorizer, FeatureVector, VectorizerConfig, Vocabulary};
