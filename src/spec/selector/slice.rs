//! Slice selectors for selecting array slices in JSONPath
use crate::error::Error;
use crate::location::PathElement;
use crate::spec::context::{Context, Env};
use crate::spec::query::Queryable;

/// A Python-style slice selector
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct Slice {
    /// The start of the slice
    ///
    /// This can be negative to start the slice from a position relative to
    /// the end of the array being sliced.
    pub start: Option<isize>,
    /// The end of the slice
    ///
    /// This can be negative to end the slice at a position relative to the
    /// end of the array being sliced.
    pub end: Option<isize>,
    /// The step of the slice
    ///
    /// This can be negative to step through the array in reverse order. A
    /// step of `0` selects nothing, regardless of the bounds.
    pub step: Option<isize>,
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        write!(f, ":")?;
        if let Some(step) = self.step {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[doc(hidden)]
impl Slice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: isize) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: isize) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }
}

impl Queryable for Slice {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Slice", level = "trace", parent = None, skip(_env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, _env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        let Some(list) = ctx.borrowed().and_then(|value| value.as_array()) else {
            return Ok(vec![]);
        };
        let mut result = Vec::new();
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Ok(vec![]);
        }
        let Ok(len) = isize::try_from(list.len()) else {
            return Ok(vec![]);
        };
        if step > 0 {
            let start = normalize_slice_index(self.start.unwrap_or(0), len).max(0);
            let end = normalize_slice_index(self.end.unwrap_or(len), len).min(len);
            let mut i = start;
            while i < end {
                if let Some((u, v)) = usize::try_from(i).ok().and_then(|u| list.get(u).map(|v| (u, v))) {
                    result.push(ctx.child(PathElement::Index(u), v));
                }
                i += step;
            }
        } else {
            let start = normalize_slice_index(self.start.unwrap_or(len - 1), len).min(len - 1);
            let end = match self.end {
                Some(end) => normalize_slice_index(end, len).max(-1),
                None => -1,
            };
            let mut i = start;
            while i > end {
                if let Some((u, v)) = usize::try_from(i).ok().and_then(|u| list.get(u).map(|v| (u, v))) {
                    result.push(ctx.child(PathElement::Index(u), v));
                }
                i += step;
            }
        }
        Ok(result)
    }
}

/// Add negative indices to the array length once; the result may still fall
/// outside `0..len` and is clamped by the caller
fn normalize_slice_index(index: isize, len: isize) -> isize {
    if index >= 0 {
        index
    } else {
        len.saturating_add(index)
    }
}
