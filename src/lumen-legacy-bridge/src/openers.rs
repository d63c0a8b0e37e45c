//! The ordered file-open handler chain.

use std::sync::Arc;

use lumen_legacy_api::{LegacyOpener, OpenedObject};

/// Extension the drag-and-drop path ignores outright; lookup-table files
/// stay with the legacy runtime's own handling.
pub const LUT_EXTENSION: &str = ".lut";

/// First-match-wins chain of [`LegacyOpener`]s.
///
/// Order is significant: openers are consulted in registration order and
/// the first `Some` short-circuits the rest.
#[derive(Default)]
pub struct OpenerChain {
    openers: Vec<Arc<dyn LegacyOpener>>,
}

impl OpenerChain {
    pub fn new(openers: Vec<Arc<dyn LegacyOpener>>) -> Self {
        Self { openers }
    }

    pub fn is_empty(&self) -> bool {
        self.openers.is_empty()
    }

    pub fn open(
        &self,
        path: Option<&str>,
        plane_index: Option<usize>,
        display: bool,
    ) -> Option<OpenedObject> {
        self.openers
            .iter()
            .find_map(|opener| opener.open(path, plane_index, display))
    }
}
