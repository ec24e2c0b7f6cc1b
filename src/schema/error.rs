#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum SchemaError {
    #[error("unsupported $ref target: {0}")]
    UnsupportedRef(String),

    #[error("unresolvable $ref: {0}")]
    UnresolvableRef(String),
}
