use crate::{
    dtag::DTag,
    error::{Error, Result},
    MAX_DEPTH,
};

/// Stack of currently open elements, shared by the encoder and decoder.
#[derive(Clone, Debug, Default)]
pub struct DepthTracker {
    tracking: Vec<DTag>,
}

impl DepthTracker {
    /// Create a new depth tracker
    pub fn new() -> Self {
        Self {
            tracking: Vec::new(),
        }
    }

    /// Record a newly opened element.
    pub fn enter(&mut self, tag: DTag) -> Result<()> {
        self.tracking.push(tag);
        if self.tracking.len() > MAX_DEPTH {
            return Err(Error::ParseLimit("Depth limit exceeded".to_string()));
        }
        Ok(())
    }

    /// Record an element close, returning the element that was closed.
    pub fn exit(&mut self) -> Result<DTag> {
        self.tracking
            .pop()
            .ok_or_else(|| Error::BadEncode(String::from("Element close with no open element")))
    }

    pub fn depth(&self) -> usize {
        self.tracking.len()
    }

    /// The innermost open element, if any.
    pub fn current(&self) -> Option<DTag> {
        self.tracking.last().copied()
    }
}
