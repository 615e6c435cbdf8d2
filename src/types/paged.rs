use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A page of results.
///
/// Invariants: `total >= items.len()`, `page >= 1`, `page_size >= 1`.
/// [`unwrap_paged_envelope`](crate::envelope::unwrap_paged_envelope) enforces
/// them before handing a value out.
///
/// The counters accept any JSON number with an integral, non-negative value,
/// so `3.0` reads as `3`; `2.5` or `-1` are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedData<T> {
    pub items: Vec<T>,
    #[serde(deserialize_with = "count")]
    pub total: u64,
    #[serde(deserialize_with = "count")]
    pub page: u64,
    #[serde(deserialize_with = "count")]
    pub page_size: u64,
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(v) = n.as_u64() {
        return Ok(v);
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
        _ => Err(D::Error::custom(format!("expected a non-negative integer, got {}", n))),
    }
}

impl<T> PagedData<T> {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedData<U> {
        PagedData {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub(crate) fn invariant_violation(&self) -> Option<&'static str> {
        if self.page < 1 {
            Some("page must be >= 1")
        } else if self.page_size < 1 {
            Some("pageSize must be >= 1")
        } else if self.total < self.items.len() as u64 {
            Some("total must be >= items.length")
        } else {
            None
        }
    }
}
