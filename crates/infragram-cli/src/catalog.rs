//! Built-in diagram catalog.
//!
//! Each entry is a scene document compiled into the binary from
//! `diagrams/<name>.toml`.

/// A named scene document shipped with the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinDiagram {
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

macro_rules! builtin {
    ($name:literal, $description:literal) => {
        BuiltinDiagram {
            name: $name,
            description: $description,
            source: include_str!(concat!("../diagrams/", $name, ".toml")),
        }
    };
}

/// Every built-in diagram, in listing order.
pub const BUILTINS: &[BuiltinDiagram] = &[
    builtin!("simple-web-stack", "Single server running the whole stack"),
    builtin!("request-flow", "Steps of a request through the simple web stack"),
    builtin!(
        "distributed-web",
        "Load balancer with two web servers and a replicated database"
    ),
    builtin!("load-balancing", "Round robin request distribution"),
    builtin!("database-replication", "Primary-replica database replication"),
    builtin!("secured-web", "Firewalls, HTTPS and monitoring agents"),
    builtin!("scale-up", "Separated tiers behind a clustered load balancer"),
    builtin!(
        "infrastructure-issues",
        "Failure points, security gaps and fixes of the distributed stack"
    ),
    builtin!("security-layers", "Network zones and the control guarding each one"),
    builtin!("monitoring-flow", "Logs and metrics shipped to the monitoring service"),
    builtin!("ssl-encryption", "HTTPS terminated at the load balancer"),
    builtin!("component-separation", "Monolithic servers next to separated tiers"),
    builtin!(
        "load-balancer-clustering",
        "Master and backup load balancers sharing a virtual IP"
    ),
    builtin!("resource-optimization", "CPU, memory and storage sized per tier"),
];

/// Looks up a built-in diagram by name.
pub fn find(name: &str) -> Option<&'static BuiltinDiagram> {
    BUILTINS.iter().find(|diagram| diagram.name == name)
}
