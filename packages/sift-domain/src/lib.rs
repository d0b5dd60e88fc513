pub mod entities;
pub mod factors;
pub mod intent;
pub mod lexicon;
pub mod params;
pub mod query;
pub mod ranking;
pub mod tagging;
pub mod terms;
