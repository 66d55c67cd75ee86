// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::source::ElementId;

/// Why a viewer could not be constructed from its source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The selector matched nothing.
    #[error("no elements match selector `{0}`")]
    NoMatchingElements(String),
    /// An element the selector matched is neither `img` nor `a`.
    #[error("element {element:?} is a `{tag}`; expected `img`, or `a` containing an `img`")]
    InvalidElement {
        /// Offending element.
        element: ElementId,
        /// Its tag name.
        tag: String,
    },
    /// An anchor without a child image.
    #[error("anchor {0:?} does not contain an `img`")]
    AnchorWithoutImage(ElementId),
    /// An element with neither a source nor a srcset.
    #[error("element {0:?} has no href, src or srcset")]
    MissingSource(ElementId),
    /// The host could not describe an element it returned from a query.
    #[error("element {0:?} is no longer available")]
    UnknownElement(ElementId),
    /// An image record with an empty `src`.
    #[error("image record {0} has an empty `src`")]
    MissingRecordSource(usize),
    /// An empty list of image records.
    #[error("no image records given")]
    EmptyRecords,
}
