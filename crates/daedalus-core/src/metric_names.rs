//! Names of the counters recorded while binding.

/// Counter of bind attempts, labelled by `source` and `outcome`.
pub const BIND_TOTAL: &str = "daedalus_bind_total";

/// Counter of field conversion failures, labelled by `kind`.
pub const BIND_FIELD_ERRORS_TOTAL: &str = "daedalus_bind_field_errors_total";
