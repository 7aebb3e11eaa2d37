//! Terminal chat logic: input classification and the transcript-owning
//! session. The interactive loop that drives these lives in gemtalk-api.

pub mod input;
pub mod session;
