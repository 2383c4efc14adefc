//! Pattern based query resolution
//!
//! `PatternResolver` walks the current pattern table for the first entry
//! matching a query and synthesizes the answer for the requested type:
//!
//! * `MX` - a fake mail host `mail.<query>`, registered as an A answer
//! * `CNAME` - a fake alias `cname.<query>`, registered as an A answer
//! * `PTR` - never answered here; PTR answers are registered as a side
//!   effect of resolving other types
//! * anything else - the mapped address, with its reverse name registered
//!   as a PTR answer pointing back to the query

use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;

use crate::dns::answers::AnswerRegistry;
use crate::dns::errors::{ParseError, PatternResult};
use crate::dns::pattern_table::PatternStore;
use crate::dns::query_type::QueryType;

const FAKE_MX_PREFIX: &str = "mail.";
const FAKE_CNAME_PREFIX: &str = "cname.";
const REVERSE_SUFFIX: &str = "in-addr.arpa.";

/// Something able to answer a query from its own data
pub trait AnswerProvider {
    fn get_answer(&self, query: &str, qtype: QueryType) -> Option<String>;
}

/// Something whose data can be re-read from its source on demand
pub trait Reloadable {
    fn reload(&self);
}

pub struct PatternResolver {
    store: Arc<PatternStore>,
    registry: Arc<dyn AnswerRegistry + Send + Sync>,
}

impl PatternResolver {
    pub fn new(
        store: Arc<PatternStore>,
        registry: Arc<dyn AnswerRegistry + Send + Sync>,
    ) -> PatternResolver {
        PatternResolver { store, registry }
    }

    pub fn store(&self) -> &Arc<PatternStore> {
        &self.store
    }

    pub fn resolve(&self, query: &str, qtype: QueryType) -> Option<String> {
        if qtype == QueryType::Ptr {
            return None;
        }

        // One snapshot for the whole lookup, so a concurrent reload can't
        // mix entries from two tables
        let table = self.store.current();
        let entry = table.find(query)?;
        let answer = entry.target.clone();

        match qtype {
            QueryType::Mx => {
                let host = fake_mx_host(query);
                self.registry.register(&host, QueryType::A, &answer);
                Some(host)
            }
            QueryType::Cname => {
                let host = fake_cname_host(query);
                self.registry.register(&host, QueryType::A, &answer);
                Some(host)
            }
            _ => {
                match reverse_ip(&answer) {
                    Ok(reverse) => self.registry.register(&reverse, QueryType::Ptr, query),
                    Err(_) => log::debug!("not an ipv4 address, ptr ignored: {}", answer),
                }
                Some(answer)
            }
        }
    }

    /// Reload from the configured zones file, keeping the current table if
    /// the file can't be read
    pub fn reload(&self) -> PatternResult<usize> {
        self.store.reload()
    }

    /// Reload from an explicit path; later `reload` calls still read the
    /// configured zones file
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> PatternResult<usize> {
        self.store.reload_from(path)
    }
}

impl AnswerProvider for PatternResolver {
    fn get_answer(&self, query: &str, qtype: QueryType) -> Option<String> {
        self.resolve(query, qtype)
    }
}

impl Reloadable for PatternResolver {
    fn reload(&self) {
        // Failures are already logged by the store and leave the old table in place
        let _ = PatternResolver::reload(self);
    }
}

pub fn fake_mx_host(domain: &str) -> String {
    format!("{}{}", FAKE_MX_PREFIX, domain)
}

pub fn fake_cname_host(domain: &str) -> String {
    format!("{}{}", FAKE_CNAME_PREFIX, domain)
}

/// Reverse lookup name for an IPv4 address, e.g. `1.2.3.4` becomes
/// `4.3.2.1.in-addr.arpa.`
pub fn reverse_ip(ip: &str) -> Result<String, ParseError> {
    let addr = ip
        .parse::<Ipv4Addr>()
        .map_err(|source| ParseError::InvalidAddress {
            value: ip.to_string(),
            source,
        })?;

    let mut name = String::new();
    for octet in addr.octets().iter().rev() {
        name.push_str(&octet.to_string());
        name.push('.');
    }
    name.push_str(REVERSE_SUFFIX);

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::answers::SynchronizedAnswers;
    use crate::dns::pattern_table::PatternTable;

    fn resolver_with(lines: Vec<&str>) -> (PatternResolver, Arc<SynchronizedAnswers>) {
        let store = Arc::new(PatternStore::with_table(
            "/nonexistent/patternzone/zones",
            PatternTable::from_lines(lines),
        ));
        let answers = Arc::new(SynchronizedAnswers::new());
        (PatternResolver::new(store, answers.clone()), answers)
    }

    #[test]
    fn test_reverse_ip() {
        assert_eq!(reverse_ip("10.0.0.1").unwrap(), "1.0.0.10.in-addr.arpa.");
        assert_eq!(reverse_ip("1.2.3.4").unwrap(), "4.3.2.1.in-addr.arpa.");
        assert!(reverse_ip("::1").is_err());
        assert!(reverse_ip("foo").is_err());
    }

    #[test]
    fn test_fake_hosts() {
        assert_eq!(fake_mx_host("foo.com"), "mail.foo.com");
        assert_eq!(fake_cname_host("foo.com"), "cname.foo.com");
    }

    #[test]
    fn test_resolve_a_registers_ptr() {
        let (resolver, answers) = resolver_with(vec!["1.2.3.4 *.foo.com"]);

        let answer = resolver.resolve("www.foo.com.", QueryType::A);
        assert_eq!(answer, Some("1.2.3.4".to_string()));
        assert_eq!(
            answers.lookup("4.3.2.1.in-addr.arpa.", QueryType::Ptr),
            Some("www.foo.com.".to_string())
        );
    }

    #[test]
    fn test_resolve_mx() {
        let (resolver, answers) = resolver_with(vec!["1.2.3.4 *.foo.com"]);

        let answer = resolver.resolve("www.foo.com.", QueryType::Mx);
        assert_eq!(answer, Some("mail.www.foo.com.".to_string()));
        assert_eq!(
            answers.lookup("mail.www.foo.com.", QueryType::A),
            Some("1.2.3.4".to_string())
        );
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_resolve_cname() {
        let (resolver, answers) = resolver_with(vec!["1.2.3.4 foo.com"]);

        let answer = resolver.resolve("foo.com.", QueryType::Cname);
        assert_eq!(answer, Some("cname.foo.com.".to_string()));
        assert_eq!(
            answers.lookup("cname.foo.com.", QueryType::A),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn test_ptr_never_answered() {
        let (resolver, answers) = resolver_with(vec!["1.2.3.4 *"]);

        assert_eq!(resolver.resolve("4.3.2.1.in-addr.arpa.", QueryType::Ptr), None);
        assert!(answers.is_empty());
    }

    #[test]
    fn test_no_match() {
        let (resolver, answers) = resolver_with(vec!["1.2.3.4 *.foo.com"]);

        assert_eq!(resolver.resolve("www.bar.com.", QueryType::A), None);
        assert_eq!(resolver.resolve("www.bar.com.", QueryType::Mx), None);
        assert!(answers.is_empty());
    }

    #[test]
    fn test_ipv6_answer_skips_ptr() {
        let (resolver, answers) = resolver_with(vec!["2001:db8::1 *.six.com"]);

        let answer = resolver.resolve("host.six.com.", QueryType::Aaaa);
        assert_eq!(answer, Some("2001:db8::1".to_string()));
        assert!(answers.is_empty());
    }

    #[test]
    fn test_answer_is_address_as_written() {
        let (resolver, answers) = resolver_with(vec!["2001:DB8::1 *.six.com"]);

        assert_eq!(
            resolver.resolve("host.six.com.", QueryType::A),
            Some("2001:DB8::1".to_string())
        );
        assert_eq!(
            resolver.resolve("host.six.com.", QueryType::Mx),
            Some("mail.host.six.com.".to_string())
        );
        assert_eq!(
            answers.lookup("mail.host.six.com.", QueryType::A),
            Some("2001:DB8::1".to_string())
        );
    }

    #[test]
    fn test_other_types_answer_like_a() {
        let (resolver, _) = resolver_with(vec!["1.2.3.4 *.foo.com"]);

        assert_eq!(
            resolver.resolve("x.foo.com.", QueryType::Unknown(99)),
            Some("1.2.3.4".to_string())
        );
        assert_eq!(
            resolver.resolve("x.foo.com.", QueryType::Txt),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn test_answer_provider_trait() {
        let (resolver, _) = resolver_with(vec!["1.2.3.4 *.foo.com"]);
        let provider: &dyn AnswerProvider = &resolver;

        assert_eq!(
            provider.get_answer("x.foo.com.", QueryType::A),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn test_reloadable_keeps_table_on_missing_file() {
        let (resolver, _) = resolver_with(vec!["1.2.3.4 *.foo.com"]);

        Reloadable::reload(&resolver);
        assert_eq!(
            resolver.resolve("x.foo.com.", QueryType::A),
            Some("1.2.3.4".to_string())
        );
    }
}
