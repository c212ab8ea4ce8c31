//! Theory module to documentation cross-references.

/// Pattern ids and term ids relevant to a theory module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLinks {
    pub patterns: &'static [&'static str],
    pub terms: &'static [&'static str],
}

const EMPTY: ModuleLinks = ModuleLinks {
    patterns: &[],
    terms: &[],
};

/// Number of theory modules in the course.
pub const MODULE_COUNT: u32 = 16;

/// Links for `module_id`. Ids outside `1..=16` have no links.
pub fn module_links(module_id: u32) -> ModuleLinks {
    match module_id {
        1 => links(&[], &["interoperability", "coupling"]),
        2 => links(&[], &["pas", "policy", "quote", "claim", "premium"]),
        3 => links(&["api-gateway"], &["api-gateway", "rest"]),
        4 => links(
            &["api-gateway", "bff"],
            &["api-gateway", "bff", "rate-limiting"],
        ),
        5 => links(
            &["api-composition", "anti-corruption-layer", "strangler-fig"],
            &["api-composition", "acl"],
        ),
        6 => links(
            &["pubsub", "message-queue"],
            &["pubsub", "message-queue", "at-least-once"],
        ),
        7 => links(
            &["event-sourcing", "cqrs"],
            &["event-sourcing", "cqrs"],
        ),
        8 => links(
            &["saga", "outbox", "dead-letter-queue"],
            &["saga", "outbox", "dlq", "compensation"],
        ),
        9 => links(&["etl"], &["etl"]),
        10 => links(&["cdc"], &["cdc"]),
        11 => links(
            &["mdm", "data-quality", "data-lineage"],
            &["mdm", "golden-record", "data-lineage", "data-quality"],
        ),
        12 => links(
            &["circuit-breaker", "retry-backoff"],
            &["circuit-breaker", "retry", "fallback", "bulkhead"],
        ),
        13 => links(
            &["distributed-tracing"],
            &["distributed-tracing", "observability"],
        ),
        14 => links(
            &["jwt-authentication", "rate-limiting"],
            &["jwt", "rate-limiting"],
        ),
        15 => links(&[], &["orchestration", "choreography", "adr"]),
        _ => EMPTY,
    }
}

const fn links(patterns: &'static [&'static str], terms: &'static [&'static str]) -> ModuleLinks {
    ModuleLinks { patterns, terms }
}
