//! Connect string resolution.
//!
//! Three notations are accepted by the client:
//! - a bracketed connect descriptor, `(DESCRIPTION=(ADDRESS=...)(CONNECT_DATA=...))`
//! - easy connect, `[//]host[:port][/service]`
//! - a bare instance name resolved through the client's naming configuration
//!
//! [`resolve`] turns structured host/port/database settings into one of these,
//! or into an empty string when the client should fall back to its ambient
//! configuration.

use std::sync::OnceLock;

use regex::Regex;

/// A recognized connect string notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsnGrammar {
    Descriptor,
    EasyConnect,
    InstanceName,
}

impl DsnGrammar {
    /// All grammars, in the order they are tried.
    pub const ALL: [DsnGrammar; 3] = [
        DsnGrammar::Descriptor,
        DsnGrammar::EasyConnect,
        DsnGrammar::InstanceName,
    ];

    fn pattern(self) -> &'static Regex {
        static DESCRIPTOR: OnceLock<Regex> = OnceLock::new();
        static EASY_CONNECT: OnceLock<Regex> = OnceLock::new();
        static INSTANCE_NAME: OnceLock<Regex> = OnceLock::new();

        match self {
            DsnGrammar::Descriptor => DESCRIPTOR
                .get_or_init(|| compile(r"^\(DESCRIPTION=(\(.+\)){2,}\)$")),
            DsnGrammar::EasyConnect => EASY_CONNECT.get_or_init(|| {
                compile(
                    r"(?i)^(//)?[a-z0-9.:_-]+(:[1-9][0-9]{0,4})?(/[a-z0-9$_]+)?(:[^/])?(/[a-z0-9$_]+)?$",
                )
            }),
            DsnGrammar::InstanceName => {
                INSTANCE_NAME.get_or_init(|| compile(r"(?i)^[a-z0-9$_]+$"))
            }
        }
    }

    pub fn matches(self, candidate: &str) -> bool {
        self.pattern().is_match(candidate)
    }

    /// Returns the first grammar the candidate satisfies.
    pub fn classify(candidate: &str) -> Option<DsnGrammar> {
        Self::ALL.into_iter().find(|grammar| grammar.matches(candidate))
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals; a failure here is a programming error caught by the unit tests.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid connect string pattern {pattern}: {e}"))
}

/// Returns true if the candidate matches any recognized grammar.
pub fn is_valid_dsn(candidate: &str) -> bool {
    DsnGrammar::classify(candidate).is_some()
}

/// How a connect string was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DsnOutcome {
    /// The host field held a complete descriptor.
    Descriptor(String),
    /// `host[:port][/database]` composed into an easy connect string.
    Composed(String),
    /// The host field alone is a valid easy connect string or instance name.
    Host(DsnGrammar, String),
    /// The database field is itself a connect string; the client resolves it.
    DeferredToDatabase(DsnGrammar),
    /// Nothing recognizable; the client falls back to its environment.
    Empty,
}

impl DsnOutcome {
    /// The connect string to pass to the client. Empty defers to the environment.
    pub fn connect_string(&self) -> &str {
        match self {
            DsnOutcome::Descriptor(s) | DsnOutcome::Composed(s) | DsnOutcome::Host(_, s) => s,
            DsnOutcome::DeferredToDatabase(_) | DsnOutcome::Empty => "",
        }
    }

    pub fn into_connect_string(self) -> String {
        match self {
            DsnOutcome::Descriptor(s) | DsnOutcome::Composed(s) | DsnOutcome::Host(_, s) => s,
            DsnOutcome::DeferredToDatabase(_) | DsnOutcome::Empty => String::new(),
        }
    }
}

fn strip_whitespace(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}

/// Resolves a connect string from host, port and database settings.
pub fn resolve(host: &str, port: Option<u16>, database: &str) -> DsnOutcome {
    let host = strip_whitespace(host);
    let database = strip_whitespace(database);

    if DsnGrammar::Descriptor.matches(&host) {
        return DsnOutcome::Descriptor(host);
    }

    let plain_host = !host.is_empty() && !host.contains('/') && !host.contains(':');
    let port_part = match port {
        Some(port) if port > 0 => format!(":{port}"),
        _ => String::new(),
    };
    let database_part = if database.is_empty() {
        String::new()
    } else {
        format!("/{}", database.trim_start_matches('/'))
    };

    if plain_host && !(port_part.is_empty() && database_part.is_empty()) {
        let composed = format!("{host}{port_part}{database_part}");
        if DsnGrammar::EasyConnect.matches(&composed) {
            return DsnOutcome::Composed(composed);
        }
    }

    if DsnGrammar::EasyConnect.matches(&host) {
        return DsnOutcome::Host(DsnGrammar::EasyConnect, host);
    }
    if DsnGrammar::InstanceName.matches(&host) {
        return DsnOutcome::Host(DsnGrammar::InstanceName, host);
    }

    match DsnGrammar::classify(&database) {
        Some(grammar) => DsnOutcome::DeferredToDatabase(grammar),
        None => DsnOutcome::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DESCRIPTOR: &str =
        "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=x)(PORT=1521))(CONNECT_DATA=(SERVICE_NAME=orcl)))";

    #[test]
    fn test_resolve_table() {
        let cases: Vec<(&str, Option<u16>, &str, DsnOutcome)> = vec![
            // descriptor in the host field
            (
                DESCRIPTOR,
                Some(1521),
                "orcl",
                DsnOutcome::Descriptor(DESCRIPTOR.to_string()),
            ),
            // composed easy connect
            (
                "db.example.com",
                Some(1521),
                "orcl",
                DsnOutcome::Composed("db.example.com:1521/orcl".to_string()),
            ),
            (
                "db.example.com",
                None,
                "/orcl",
                DsnOutcome::Composed("db.example.com/orcl".to_string()),
            ),
            (
                "db.example.com",
                Some(1521),
                "",
                DsnOutcome::Composed("db.example.com:1521".to_string()),
            ),
            // host is already an easy connect string
            (
                "db.example.com:1521/orcl",
                Some(1522),
                "other",
                DsnOutcome::Host(
                    DsnGrammar::EasyConnect,
                    "db.example.com:1521/orcl".to_string(),
                ),
            ),
            // composition fails on the service name, host alone is valid
            (
                "db.example.com",
                Some(1521),
                "bad-service",
                DsnOutcome::Host(DsnGrammar::EasyConnect, "db.example.com".to_string()),
            ),
            // instance name with characters easy connect rejects
            (
                "ORCL$1",
                None,
                "",
                DsnOutcome::Host(DsnGrammar::InstanceName, "ORCL$1".to_string()),
            ),
            // database field is itself a connect string
            (
                "",
                None,
                "orcl",
                DsnOutcome::DeferredToDatabase(DsnGrammar::EasyConnect),
            ),
            (
                "",
                None,
                DESCRIPTOR,
                DsnOutcome::DeferredToDatabase(DsnGrammar::Descriptor),
            ),
            // nothing usable
            ("", None, "", DsnOutcome::Empty),
            ("not a host!", Some(1521), "bad service!", DsnOutcome::Empty),
        ];

        for (host, port, database, expected) in cases {
            assert_eq!(
                resolve(host, port, database),
                expected,
                "host={host:?} port={port:?} database={database:?}"
            );
        }
    }

    #[test]
    fn test_connect_string_examples() {
        assert_eq!(
            resolve("db.example.com", Some(1521), "orcl").connect_string(),
            "db.example.com:1521/orcl"
        );
        assert_eq!(resolve(DESCRIPTOR, None, "").connect_string(), DESCRIPTOR);
        assert_eq!(resolve("", None, "orcl").connect_string(), "");
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let host = "(DESCRIPTION=\n  (ADDRESS=(PROTOCOL=TCP)(HOST=x)(PORT=1521))\n  (CONNECT_DATA=(SERVICE_NAME=orcl)))";
        assert_eq!(resolve(host, None, "").connect_string(), DESCRIPTOR);
        assert_eq!(
            resolve(" db.example.com ", Some(1521), " orcl").connect_string(),
            "db.example.com:1521/orcl"
        );
    }

    #[test]
    fn test_zero_port_is_ignored() {
        assert_eq!(
            resolve("db.example.com", Some(0), "orcl").connect_string(),
            "db.example.com/orcl"
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(DsnGrammar::classify(DESCRIPTOR), Some(DsnGrammar::Descriptor));
        assert_eq!(
            DsnGrammar::classify("//host:1521/svc"),
            Some(DsnGrammar::EasyConnect)
        );
        assert_eq!(DsnGrammar::classify("ORCL$1"), Some(DsnGrammar::InstanceName));
        assert_eq!(DsnGrammar::classify("has space"), None);
        assert!(!is_valid_dsn(""));
    }

    proptest! {
        /// Property: the connect string is empty or satisfies a recognized grammar
        #[test]
        fn resolved_string_is_empty_or_recognized(
            host in r"[ a-zA-Z0-9.:/_$()=\-]{0,40}",
            port in proptest::option::of(any::<u16>()),
            database in r"[ a-zA-Z0-9/_$\-]{0,20}",
        ) {
            let outcome = resolve(&host, port, &database);
            let connect_string = outcome.connect_string();
            prop_assert!(
                connect_string.is_empty() || is_valid_dsn(connect_string),
                "unrecognized connect string {:?}", connect_string
            );
        }

        /// Property: a descriptor host is returned unchanged
        #[test]
        fn descriptor_host_round_trips(
            service in "[A-Za-z0-9_]{1,12}",
            port in 1u16..=u16::MAX,
            database in "[a-z]{0,8}",
        ) {
            let descriptor = format!(
                "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=h)(PORT={port}))(CONNECT_DATA=(SERVICE_NAME={service})))"
            );
            let outcome = resolve(&descriptor, Some(port), &database);
            prop_assert_eq!(outcome, DsnOutcome::Descriptor(descriptor));
        }
    }
}
