// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::extension::ViewData;
use crate::hooks::TransitionEnv;
use crate::host::{ContainerMotion, SlideDirection};

/// Default transition: slide one viewport width between adjacent items.
///
/// Moves to the next index, and from the last item to the first, slide
/// forward; the reverse slides backward. Jumps, opening, reduced motion and
/// superseded navigations swap without motion.
pub fn slide_transition(data: &ViewData, env: &TransitionEnv) -> Option<ContainerMotion> {
    if env.is_aborted() || env.reduced_motion {
        return None;
    }
    let from = data.index.from?;
    let to = data.index.to;
    let last = env.total.checked_sub(1)?;

    let forward = to == from + 1 || (from == last && to == 0);
    let backward = from == to + 1 || (from == 0 && to == last);
    let direction = if forward {
        SlideDirection::Forward
    } else if backward {
        SlideDirection::Backward
    } else {
        return None;
    };
    Some(ContainerMotion::Slide {
        direction,
        duration: env.duration,
    })
}
