//! Endpoint identifier canonicalization.
//!
//! Raw endpoint strings arrive in several historical spellings; routes
//! from different services (and from the XML schema path) must still
//! agree on node identity. Normalization is deterministic and
//! idempotent, so canonical strings can be re-normalized freely.

const VIRTUAL_TOPIC: &str = "VirtualTopic.";

/// Return the canonical form of a raw endpoint identifier.
///
/// Applied rules, in order:
/// 1. percent-decoding of braces: `%7B` -> `{`, `%7D` -> `}`, so encoded
///    template placeholders compare equal to literal ones
/// 2. scheme folding: every `://` becomes `:`, then `activemq:` -> `jms:`
/// 3. virtual-topic folding: broker-specific prefixes between the scheme
///    and `VirtualTopic.` are discarded, so producer and consumer
///    spellings of the same logical topic compare equal
/// 4. query stripping: everything from the first `?` is dropped
pub fn normalize_endpoint(raw: &str) -> String {
    let mut endpoint = raw.replace("%7B", "{").replace("%7D", "}");

    endpoint = endpoint.replace("://", ":");
    if let Some(rest) = endpoint.strip_prefix("activemq:") {
        endpoint = format!("jms:{}", rest);
    }

    if let Some(pos) = endpoint.find(VIRTUAL_TOPIC) {
        // Keep the scheme when one precedes the occurrence; drop any
        // broker-specific prefix in between (Consumer.*, broker ids, ...).
        let scheme = match endpoint[..pos].find(':') {
            Some(colon) => &endpoint[..=colon],
            None => "",
        };
        let folded = format!("{}{}", scheme, &endpoint[pos..]);
        endpoint = folded;
    }

    if let Some(query) = endpoint.find('?') {
        endpoint.truncate(query);
    }

    endpoint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_folding() {
        assert_eq!(normalize_endpoint("jms://orders"), "jms:orders");
        assert_eq!(normalize_endpoint("direct://dispatch"), "direct:dispatch");
        assert_eq!(normalize_endpoint("direct-vm://local"), "direct-vm:local");
        assert_eq!(normalize_endpoint("seda://buffer"), "seda:buffer");
        assert_eq!(normalize_endpoint("timer://tick"), "timer:tick");
        assert_eq!(normalize_endpoint("bean://mapper"), "bean:mapper");
        assert_eq!(normalize_endpoint("rest://api"), "rest:api");
        assert_eq!(normalize_endpoint("topic://events"), "topic:events");
    }

    #[test]
    fn test_scheme_folding_is_not_an_allow_list() {
        // Any scheme folds, not just the common ones
        assert_eq!(normalize_endpoint("sftp://host/drop"), "sftp:host/drop");
        assert_eq!(normalize_endpoint("kafka://orders"), "kafka:orders");
    }

    #[test]
    fn test_legacy_messaging_scheme() {
        assert_eq!(normalize_endpoint("activemq:orders"), "jms:orders");
        assert_eq!(normalize_endpoint("activemq://orders"), "jms:orders");
    }

    #[test]
    fn test_percent_encoded_braces_decoded() {
        assert_eq!(
            normalize_endpoint("seda:%7B%7BdynamicName%7D%7D"),
            "seda:{{dynamicName}}"
        );
        assert_eq!(
            normalize_endpoint("seda://%7B%7BdynamicName%7D%7D"),
            "seda:{{dynamicName}}"
        );
    }

    #[test]
    fn test_virtual_topic_folding() {
        // Producer and consumer spellings collapse to the same string
        assert_eq!(
            normalize_endpoint("activemq:VirtualTopic.broker.orders"),
            "jms:VirtualTopic.broker.orders"
        );
        assert_eq!(
            normalize_endpoint("jms:Consumer.billing.VirtualTopic.broker.orders"),
            "jms:VirtualTopic.broker.orders"
        );
        // No scheme at all: the fold alone remains
        assert_eq!(
            normalize_endpoint("Consumer.billing.VirtualTopic.orders"),
            "VirtualTopic.orders"
        );
    }

    #[test]
    fn test_query_stripping() {
        assert_eq!(
            normalize_endpoint("jms:orders?concurrentConsumers=5&timeout=100"),
            "jms:orders"
        );
        assert_eq!(normalize_endpoint("timer://tick?period=5000"), "timer:tick");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "jms://orders?selector=x",
            "activemq:Consumer.app.VirtualTopic.orders",
            "direct://dispatch",
            "sftp://host/drop",
            "seda:%7B%7BdynamicName%7D%7D",
            "seda:{{dynamicName}}",
            "plain-endpoint",
        ];
        for sample in samples {
            let once = normalize_endpoint(sample);
            assert_eq!(normalize_endpoint(&once), once, "not idempotent: {}", sample);
        }
    }

    #[test]
    fn test_placeholders_pass_through() {
        // Filtering placeholder endpoints is the normalizer's caller's job
        assert_eq!(normalize_endpoint("seda:{{dynamicName}}"), "seda:{{dynamicName}}");
    }
}
