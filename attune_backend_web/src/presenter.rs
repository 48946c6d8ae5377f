// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instruction blocks in the page.
//!
//! Each [`InstructionBlock`] is an element whose id is
//! [`InstructionBlock::id`]. [`DomInstructions`] shows or hides them by
//! setting `display`, and writes the current sensor block, if any, into a
//! status element.

use alloc::string::ToString as _;

use wasm_bindgen::JsCast as _;
use web_sys::{Document, HtmlElement};

use attune_core::presenter::{InstructionBlock, InstructionPresenter, Instructions};

/// Id of the element that reports a blocked sensor.
pub const STATUS_ID: &str = "sensor-status";

/// An [`InstructionPresenter`] that toggles page elements by id.
///
/// Missing elements are skipped, so a page may carry only some blocks.
pub struct DomInstructions {
    blocks: [Option<HtmlElement>; InstructionBlock::ALL.len()],
    status: Option<HtmlElement>,
}

impl core::fmt::Debug for DomInstructions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let found = self.blocks.iter().filter(|b| b.is_some()).count();
        f.debug_struct("DomInstructions")
            .field("blocks_found", &found)
            .field("has_status", &self.status.is_some())
            .finish_non_exhaustive()
    }
}

impl DomInstructions {
    /// Looks up the instruction elements in `document`.
    #[must_use]
    pub fn new(document: &Document) -> Self {
        let find = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        Self {
            blocks: InstructionBlock::ALL.map(|block| find(block.id())),
            status: find(STATUS_ID),
        }
    }
}

impl InstructionPresenter for DomInstructions {
    fn present(&mut self, instructions: &Instructions) {
        for (block, el) in InstructionBlock::ALL.iter().zip(&self.blocks) {
            let Some(el) = el else { continue };
            let display = if instructions.is_visible(*block) {
                "block"
            } else {
                "none"
            };
            let _ = el.style().set_property("display", display);
        }

        if let Some(status) = &self.status {
            match instructions.blocked {
                Some(unavailable) => {
                    status.set_text_content(Some(&unavailable.to_string()));
                    let _ = status.style().set_property("display", "block");
                }
                None => {
                    status.set_text_content(None);
                    let _ = status.style().set_property("display", "none");
                }
            }
        }
    }
}
