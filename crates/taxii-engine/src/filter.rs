//! Normalization of request query parameters into an [`ObjectFilter`].

use std::collections::HashMap;

use taxii_store::{ObjectQuery, PageWindow};

use crate::error::{EngineError, EngineResult};

/// Filtering and pagination parameters for object and manifest queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectFilter {
    pub spec_version: Option<String>,
    pub version: Option<String>,
    /// Page size, always > 0.
    pub limit: usize,
    /// 0-based page index.
    pub offset: usize,
}

impl ObjectFilter {
    /// An unconstrained filter for the first page of `limit` rows.
    pub fn new(limit: usize) -> Self {
        Self {
            spec_version: None,
            version: None,
            limit,
            offset: 0,
        }
    }

    pub fn with_spec_version(mut self, spec_version: impl Into<String>) -> Self {
        self.spec_version = Some(spec_version.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Select a 1-based page, as clients send it.
    pub fn with_page(mut self, page: usize) -> Self {
        self.offset = page.saturating_sub(1);
        self
    }

    /// Resolve a flat query-string mapping.
    ///
    /// Recognized keys are `spec_version`, `version`, `limit` and `page`;
    /// the TAXII `match[spec_version]` / `match[version]` spellings are
    /// accepted too, with the bare key taking precedence. `spec_version` and
    /// `version` are passed through unvalidated. `limit` defaults to
    /// `default_limit`; `page` is 1-based and defaults to the first page.
    pub fn resolve(params: &HashMap<String, String>, default_limit: usize) -> EngineResult<Self> {
        let limit = match params.get("limit") {
            Some(raw) => parse_positive("limit", raw)?,
            None => default_limit,
        };
        let offset = match params.get("page") {
            Some(raw) => parse_positive("page", raw)? - 1,
            None => 0,
        };
        Ok(Self {
            spec_version: lookup(params, "spec_version"),
            version: lookup(params, "version"),
            limit,
            offset,
        })
    }

    /// The skip/limit window for the requested page.
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.offset.saturating_mul(self.limit), self.limit)
    }

    /// Whether rows remain beyond the requested page, given the total
    /// number of matching rows.
    pub fn has_next_page(&self, total: u64) -> bool {
        let seen = (self.offset as u64)
            .saturating_add(1)
            .saturating_mul(self.limit as u64);
        total > seen
    }

    /// The store predicate for a collection, constrained by whichever of
    /// spec_version and version are present.
    pub fn query(&self, collection_id: &str) -> ObjectQuery {
        ObjectQuery::collection(collection_id)
            .with_spec_version(self.spec_version.clone())
            .with_version(self.version.clone())
    }
}

fn lookup(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .or_else(|| params.get(&format!("match[{key}]")))
        .cloned()
}

fn parse_positive(name: &'static str, raw: &str) -> EngineResult<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EngineError::InvalidParameter {
            name,
            value: raw.to_string(),
        }),
    }
}
