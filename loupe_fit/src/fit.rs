// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// The CSS `object-fit` modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectFit {
    /// Stretch to the box.
    Fill,
    /// Natural size, ignoring the box.
    None,
    /// Largest size that fits inside the box, keeping aspect ratio.
    #[default]
    Contain,
    /// Smallest size that covers the box, keeping aspect ratio.
    Cover,
    /// The smaller of `None` and `Contain`.
    ScaleDown,
}

impl ObjectFit {
    /// Parse a computed-style value. Unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "fill" => Some(Self::Fill),
            "none" => Some(Self::None),
            "contain" => Some(Self::Contain),
            "cover" => Some(Self::Cover),
            "scale-down" => Some(Self::ScaleDown),
            _ => None,
        }
    }

    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::None => "none",
            Self::Contain => "contain",
            Self::Cover => "cover",
            Self::ScaleDown => "scale-down",
        }
    }
}

/// Rendered size of an image with `natural` dimensions inside a box of
/// `container` size, according to `fit`.
///
/// Without a fit mode, or when the natural size is unknown (zero), the
/// container size is returned.
pub fn fitted_size(fit: Option<ObjectFit>, natural: Size, container: Size) -> Size {
    let Some(fit) = fit else {
        return container;
    };
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return container;
    }

    let image_ar = natural.width / natural.height;
    let box_ar = container.width / container.height;
    let contain = || {
        if image_ar > box_ar {
            Size::new(container.width, container.width / image_ar)
        } else {
            Size::new(container.height * image_ar, container.height)
        }
    };

    match fit {
        ObjectFit::Fill => container,
        ObjectFit::None => natural,
        ObjectFit::Contain => contain(),
        ObjectFit::Cover => {
            if image_ar < box_ar {
                Size::new(container.width, container.width / image_ar)
            } else {
                Size::new(container.height * image_ar, container.height)
            }
        }
        ObjectFit::ScaleDown => {
            let contained = contain();
            if contained.width <= natural.width && contained.height <= natural.height {
                contained
            } else {
                natural
            }
        }
    }
}

/// Largest size with the aspect ratio of `content` that fits in `bounds`.
pub fn aspect_fit(content: Size, bounds: Size) -> Size {
    if content.width <= 0.0 || content.height <= 0.0 {
        return bounds;
    }
    let content_ar = content.width / content.height;
    if content_ar > bounds.width / bounds.height {
        Size::new(bounds.width, bounds.width / content_ar)
    } else {
        Size::new(bounds.height * content_ar, bounds.height)
    }
}

/// Size at which media with `natural` dimensions is shown at rest.
///
/// Media smaller than the viewport in both dimensions keeps its natural size;
/// anything larger is scaled down to fit.
pub fn full_size(natural: Size, viewport: Size) -> Size {
    if natural.width < viewport.width && natural.height < viewport.height {
        natural
    } else {
        aspect_fit(natural, viewport)
    }
}
