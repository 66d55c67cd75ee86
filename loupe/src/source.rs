// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item sources: host elements or in-memory records.
//!
//! A viewer shows either the elements matched by a selector (each an `img`, or
//! an `a` wrapping an `img`) or a list of [`ItemConfig`] records. Elements are
//! described by the host as [`ElementInfo`] snapshots; parsing them yields the
//! item's source, srcset and alt text, plus an [`OriginInfo`] used to animate
//! from the thumbnail and to restore it afterwards.
//!
//! Attribute precedence for elements:
//!
//! | Field    | Lookup order                                                  |
//! |----------|---------------------------------------------------------------|
//! | `src`    | `data-loupe-src`, `href`, `src`, child image `src`            |
//! | `srcset` | `data-loupe-srcset`, `srcset`, child image `srcset`           |
//! | `alt`    | `data-loupe-alt`, `alt`, child image `alt`                    |
//!
//! Empty attribute values count as absent.

use kurbo::{Rect, Size};
use loupe_fit::{ObjectFit, SrcSet};

use crate::error::SourceError;

/// Opaque handle of a host element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Where a viewer's items come from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Elements matching a selector, queried through the host.
    Selector(String),
    /// In-memory image records.
    Records(Vec<ItemConfig>),
}

/// Source, alt text and srcset of one item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ItemConfig {
    /// Full-resolution source URL.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Raw srcset attribute value.
    pub srcset: Option<String>,
}

impl ItemConfig {
    /// A record for `src` with no alt text or srcset.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    /// Set the alt text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// Set the srcset.
    #[must_use]
    pub fn with_srcset(mut self, srcset: impl Into<String>) -> Self {
        self.srcset = Some(srcset.into());
        self
    }
}

/// Snapshot of a host element, as reported by [`Host::element`](crate::Host::element).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementInfo {
    /// Element handle.
    pub id: ElementId,
    /// Lower-case tag name.
    pub tag: String,
    /// Attribute name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Bounding rectangle in viewport coordinates.
    pub rect: Rect,
    /// Computed `border-radius`.
    pub border_radius: String,
    /// Computed `object-fit`, if the element has one.
    pub object_fit: Option<String>,
    /// Intrinsic size of an image element, or zero when unknown.
    pub natural_size: Size,
    /// First `img` descendant, for anchors.
    pub child_image: Option<Box<ElementInfo>>,
}

impl ElementInfo {
    /// An element with the given handle and tag.
    pub fn new(id: ElementId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the bounding rectangle.
    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Set the computed border radius.
    #[must_use]
    pub fn with_border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = radius.into();
        self
    }

    /// Set the computed object-fit.
    #[must_use]
    pub fn with_object_fit(mut self, fit: impl Into<String>) -> Self {
        self.object_fit = Some(fit.into());
        self
    }

    /// Set the intrinsic size.
    #[must_use]
    pub fn with_natural_size(mut self, size: Size) -> Self {
        self.natural_size = size;
        self
    }

    /// Set the child image of an anchor.
    #[must_use]
    pub fn with_child_image(mut self, image: Self) -> Self {
        self.child_image = Some(Box::new(image));
        self
    }

    /// Value of attribute `name`, if present and non-empty.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// The element an item was opened from.
#[derive(Clone, Debug, PartialEq)]
pub struct OriginInfo {
    /// The anchor wrapping the image, if any.
    pub anchor: Option<ElementId>,
    /// The thumbnail image.
    pub image: ElementId,
    /// Bounding rectangle of the anchor, or of the image without one.
    pub rect: Rect,
    /// Laid-out size of the image element.
    pub image_size: Size,
    /// Intrinsic size of the thumbnail image.
    pub natural_size: Size,
    /// Border radius of the anchor if it has one, else of the image.
    pub border_radius: String,
    /// Object-fit of the image.
    pub object_fit: ObjectFit,
}

impl OriginInfo {
    /// The element that was queried: the anchor if there is one.
    pub fn element(&self) -> ElementId {
        self.anchor.unwrap_or(self.image)
    }

    /// Refresh the geometry from a new snapshot of [`element`](Self::element).
    pub fn refresh(&mut self, info: &ElementInfo) {
        self.rect = info.rect;
        let image = if self.anchor.is_some() {
            info.child_image.as_deref()
        } else {
            Some(info)
        };
        if let Some(image) = image {
            self.image_size = image.rect.size();
            self.natural_size = image.natural_size;
        }
    }
}

/// A parsed item, ready to back a media box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedItem {
    /// Source, alt and srcset.
    pub config: ItemConfig,
    /// Parsed srcset, when the item has a non-empty one.
    pub srcset: Option<SrcSet>,
    /// The element the item came from; `None` for records.
    pub origin: Option<OriginInfo>,
}

/// Parse a host element into an item.
pub fn parse_element(info: &ElementInfo) -> Result<ParsedItem, SourceError> {
    let (anchor, image) = match info.tag.as_str() {
        "img" => (None, info),
        "a" => {
            let image = info
                .child_image
                .as_deref()
                .ok_or(SourceError::AnchorWithoutImage(info.id))?;
            (Some(info), image)
        }
        other => {
            return Err(SourceError::InvalidElement {
                element: info.id,
                tag: other.to_owned(),
            });
        }
    };

    let lookup = |names: &[&str]| -> Option<String> {
        names
            .iter()
            .find_map(|name| info.attribute(name))
            .or_else(|| {
                anchor
                    .and_then(|_| names.last())
                    .and_then(|name| image.attribute(name))
            })
            .map(str::to_owned)
    };

    let srcset_attr = lookup(&["data-loupe-srcset", "srcset"]);
    let srcset = srcset_attr
        .as_deref()
        .map(SrcSet::parse)
        .filter(|set| !set.is_empty());
    let src = match lookup(&["data-loupe-src", "href", "src"]) {
        Some(src) => src,
        None => srcset
            .as_ref()
            .and_then(SrcSet::largest)
            .map(|entry| entry.url.clone())
            .ok_or(SourceError::MissingSource(info.id))?,
    };
    let alt = lookup(&["data-loupe-alt", "alt"]).unwrap_or_default();

    let border_radius = match anchor {
        Some(anchor) if !is_zero_css(&anchor.border_radius) => anchor.border_radius.clone(),
        _ => image.border_radius.clone(),
    };
    let object_fit = image
        .object_fit
        .as_deref()
        .and_then(ObjectFit::parse)
        .unwrap_or_default();

    Ok(ParsedItem {
        config: ItemConfig {
            src,
            alt,
            srcset: srcset_attr,
        },
        srcset,
        origin: Some(OriginInfo {
            anchor: anchor.map(|a| a.id),
            image: image.id,
            rect: info.rect,
            image_size: image.rect.size(),
            natural_size: image.natural_size,
            border_radius,
            object_fit,
        }),
    })
}

/// Parse an in-memory record into an item.
pub fn parse_record(index: usize, record: &ItemConfig) -> Result<ParsedItem, SourceError> {
    if record.src.is_empty() {
        return Err(SourceError::MissingRecordSource(index));
    }
    let srcset = record
        .srcset
        .as_deref()
        .map(SrcSet::parse)
        .filter(|set| !set.is_empty());
    Ok(ParsedItem {
        config: record.clone(),
        srcset,
        origin: None,
    })
}

/// Validate a record list up front.
pub(crate) fn validate_records(records: &[ItemConfig]) -> Result<(), SourceError> {
    if records.is_empty() {
        return Err(SourceError::EmptyRecords);
    }
    match records.iter().position(|r| r.src.is_empty()) {
        Some(index) => Err(SourceError::MissingRecordSource(index)),
        None => Ok(()),
    }
}

/// Returns `true` for CSS lengths that are zero in every component, such as
/// `""`, `"0px"` or `"0px 0px"`.
fn is_zero_css(value: &str) -> bool {
    value.split_whitespace().all(|part| {
        let number = part.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
        number.parse::<f64>().is_ok_and(|n| n == 0.0)
    })
}
