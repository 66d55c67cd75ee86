// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::extension::{ControlSpec, Extension, ExtensionContext};
use crate::source::ItemConfig;
use loupe_fit::SrcSet;

/// Name under which [`DownloadExtension`] registers its control.
pub const DOWNLOAD: &str = "download";

/// Adds a control that downloads the current item at its largest size.
///
/// Place it with `ControlId::extension(DOWNLOAD)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DownloadExtension;

impl DownloadExtension {
    /// Create the extension.
    pub fn new() -> Self {
        Self
    }
}

impl Extension for DownloadExtension {
    fn name(&self) -> &str {
        DOWNLOAD
    }

    fn control(&self) -> Option<ControlSpec> {
        Some(ControlSpec::new("Download image"))
    }

    fn on_control(&mut self, cx: &mut ExtensionContext<'_>) {
        let Some(current) = cx.snapshot().current.as_ref() else {
            return;
        };
        let (url, file_name) = download_target(&current.config, current.srcset.as_ref());
        log::debug!("downloading {url} as {file_name}");
        cx.download(url, file_name);
    }
}

/// URL and file name to download for an item.
///
/// The URL is the largest srcset candidate, else the source. The file name is
/// the alt text with the URL's extension, else the URL's last path segment,
/// else `download` with the extension.
pub fn download_target(config: &ItemConfig, srcset: Option<&SrcSet>) -> (String, String) {
    let url = srcset
        .and_then(SrcSet::largest)
        .map_or(config.src.as_str(), |entry| entry.url.as_str());
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let basename = path.rsplit('/').next().unwrap_or_default();
    let extension = basename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty());
    let with_extension = |stem: &str| match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_owned(),
    };

    let alt = config.alt.trim();
    let file_name = if !alt.is_empty() {
        with_extension(alt)
    } else if !basename.is_empty() {
        basename.to_owned()
    } else {
        with_extension("download")
    };
    (url.to_owned(), file_name)
}
