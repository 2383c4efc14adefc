//! Registry for answers synthesized while resolving pattern matches
//!
//! Resolving an MX or CNAME query against the pattern table yields a fake
//! host name, and resolving an A query yields an address whose reverse name
//! should answer PTR queries. Those secondary answers are handed to an
//! `AnswerRegistry` so that later, independent lookups can find them.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::dns::query_type::QueryType;

/// Sink for synthesized answers. The pattern resolver only ever writes to it.
pub trait AnswerRegistry {
    fn register(&self, name: &str, qtype: QueryType, value: &str);
}

/// Thread safe in-memory `AnswerRegistry`
///
/// Names are stored as given; a later registration for the same name and
/// type replaces the earlier value.
#[derive(Default)]
pub struct SynchronizedAnswers {
    answers: RwLock<HashMap<(String, QueryType), String>>,
}

impl SynchronizedAnswers {
    pub fn new() -> SynchronizedAnswers {
        SynchronizedAnswers {
            answers: RwLock::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, name: &str, qtype: QueryType) -> Option<String> {
        self.answers
            .read()
            .get(&(name.to_string(), qtype))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.answers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.read().is_empty()
    }

    pub fn clear(&self) {
        self.answers.write().clear();
    }
}

impl AnswerRegistry for SynchronizedAnswers {
    fn register(&self, name: &str, qtype: QueryType, value: &str) {
        log::debug!("register answer {} {} -> {}", name, qtype, value);
        self.answers
            .write()
            .insert((name.to_string(), qtype), value.to_string());
    }
}
