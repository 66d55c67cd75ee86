// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::ControlId;
use crate::extension::{
    BoxParams, ContentSnapshot, Extension, ExtensionContext, ViewData,
};
use crate::media::Media;
use crate::media_box::BoxId;
use crate::viewer::ViewerSnapshot;

/// Logs every extension hook at `debug` level under the `loupe` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggerExtension;

impl LoggerExtension {
    /// Create the extension.
    pub fn new() -> Self {
        Self
    }
}

impl Extension for LoggerExtension {
    fn name(&self) -> &str {
        "logger"
    }

    fn initialize_box(&mut self, params: &BoxParams<'_>) -> Option<Box<dyn Media>> {
        log::debug!(
            target: "loupe",
            "initialize box: index {} at position {}",
            params.index,
            params.position
        );
        None
    }

    fn on_image_view(&mut self, data: &ViewData, _cx: &mut ExtensionContext<'_>) {
        log::debug!(
            target: "loupe",
            "image view: {:?} -> {} via {:?}",
            data.index.from,
            data.index.to,
            data.via
        );
    }

    fn on_content_change(&mut self, content: &ContentSnapshot, _cx: &mut ExtensionContext<'_>) {
        log::debug!(
            target: "loupe",
            "content change: index {} at {}x{}",
            content.index,
            content.state.width,
            content.state.height
        );
    }

    fn on_open(&mut self, cx: &mut ExtensionContext<'_>) {
        log::debug!(target: "loupe", "open: {:?}", cx.snapshot().current_index);
    }

    fn on_close(&mut self, _snapshot: &ViewerSnapshot) {
        log::debug!(target: "loupe", "close");
    }

    fn on_deactivate_ui(
        &mut self,
        controls: &[ControlId],
        requester: Option<BoxId>,
        _cx: &mut ExtensionContext<'_>,
    ) {
        log::debug!(target: "loupe", "deactivate ui: {controls:?} for {requester:?}");
    }

    fn on_reactivate_ui(&mut self, _cx: &mut ExtensionContext<'_>) {
        log::debug!(target: "loupe", "reactivate ui");
    }
}
