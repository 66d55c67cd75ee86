// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host that records everything the viewer asks of it.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use kurbo::{Rect, Size};
use loupe::{
    BoxId, ContainerMotion, ControlId, ElementId, ElementInfo, Hooks, Host, ItemConfig,
    OpenRegistry, OverlaySetup, OverlayState, Placement, Projection, Source, Viewer, ViewerConfig,
    WindowSlot,
};

pub const VIEWPORT: Size = Size::new(800.0, 600.0);
pub const NATURAL: Size = Size::new(1600.0, 1200.0);
pub const FRAME_MS: u64 = 16;

#[derive(Debug, Default)]
pub struct FakeHost {
    pub now: u64,
    pub viewport: Option<Size>,
    pub reduced_motion: bool,
    pub elements: Vec<ElementInfo>,
    pub projections: Vec<(BoxId, Projection)>,
    pub loads: Vec<(BoxId, String)>,
    pub bound: Vec<(ElementId, usize)>,
    pub hidden: Vec<ElementId>,
    pub taken: Vec<ElementId>,
    pub restored: Vec<ElementId>,
    pub overlay_mounted: bool,
    pub overlay_controls: Vec<String>,
    pub overlay_states: Vec<OverlayState>,
    pub windows: Vec<Vec<WindowSlot>>,
    pub detached: Vec<BoxId>,
    pub disabled: Vec<ControlId>,
    pub navigation_visible: Option<bool>,
    pub index_display: String,
    pub description: (String, String),
    pub container: Vec<ContainerMotion>,
    pub scroll_locked: bool,
    pub downloads: Vec<(String, String)>,
}

impl FakeHost {
    pub fn take_loads(&mut self) -> Vec<BoxId> {
        self.loads.drain(..).map(|(id, _)| id).collect()
    }

    pub fn projections_of(&self, id: BoxId) -> impl Iterator<Item = &Projection> {
        self.projections
            .iter()
            .filter(move |(box_id, _)| *box_id == id)
            .map(|(_, p)| p)
    }

    pub fn last_container(&self) -> Option<&ContainerMotion> {
        self.container.last()
    }
}

impl Host for FakeHost {
    fn now(&self) -> u64 {
        self.now
    }

    fn viewport(&self) -> Size {
        self.viewport.unwrap_or(VIEWPORT)
    }

    fn query(&mut self, _selector: &str) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    fn element(&self, element: ElementId) -> Option<ElementInfo> {
        self.elements.iter().find(|e| e.id == element).cloned()
    }

    fn project(&mut self, id: BoxId, projection: &Projection) {
        self.projections.push((id, projection.clone()));
    }

    fn load_media(&mut self, id: BoxId, src: &str) {
        self.loads.push((id, src.to_owned()));
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn bind_activation(&mut self, element: ElementId, index: usize) {
        self.bound.push((element, index));
    }

    fn unbind_activation(&mut self, element: ElementId) {
        self.bound.retain(|(e, _)| *e != element);
    }

    fn set_origin_hidden(&mut self, element: ElementId, hidden: bool) {
        self.hidden.retain(|e| *e != element);
        if hidden {
            self.hidden.push(element);
        }
    }

    fn take_thumbnail(&mut self, image: ElementId, _id: BoxId) -> Option<Placement> {
        self.taken.push(image);
        Some(Placement {
            parent: ElementId(1000 + image.0),
            next_sibling: None,
            style: String::new(),
        })
    }

    fn restore_thumbnail(&mut self, image: ElementId, _placement: &Placement) {
        self.restored.push(image);
    }

    fn mount_overlay(&mut self, setup: &OverlaySetup<'_>) {
        self.overlay_mounted = true;
        self.overlay_controls = setup
            .extension_controls
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
    }

    fn unmount_overlay(&mut self) {
        self.overlay_mounted = false;
    }

    fn set_overlay_state(&mut self, state: OverlayState) {
        self.overlay_states.push(state);
    }

    fn mount_window(&mut self, slots: &[WindowSlot]) {
        self.windows.push(slots.to_vec());
    }

    fn detach_box(&mut self, id: BoxId) {
        self.detached.push(id);
    }

    fn set_control_enabled(&mut self, control: &ControlId, enabled: bool) {
        self.disabled.retain(|c| c != control);
        if !enabled {
            self.disabled.push(control.clone());
        }
    }

    fn set_navigation_visible(&mut self, visible: bool) {
        self.navigation_visible = Some(visible);
    }

    fn set_index_display(&mut self, text: &str) {
        self.index_display = text.to_owned();
    }

    fn set_description(&mut self, text: &str, label: &str) {
        self.description = (text.to_owned(), label.to_owned());
    }

    fn move_container(&mut self, motion: ContainerMotion) {
        self.container.push(motion);
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn download(&mut self, url: &str, file_name: &str) {
        self.downloads.push((url.to_owned(), file_name.to_owned()));
    }
}

pub fn records(count: usize) -> Vec<ItemConfig> {
    (0..count)
        .map(|i| ItemConfig::new(format!("img{i}.jpg")).with_alt(format!("Picture {i}")))
        .collect()
}

/// Anchors wrapping thumbnails, one per item.
pub fn gallery(count: u64) -> Vec<ElementInfo> {
    (0..count)
        .map(|i| {
            let x = 10.0 + 120.0 * i as f64;
            let image = ElementInfo::new(ElementId(100 + i), "img")
                .with_attribute("src", format!("thumb{i}.jpg"))
                .with_attribute("alt", format!("Thumb {i}"))
                .with_rect(Rect::new(x, 20.0, x + 100.0, 95.0))
                .with_natural_size(Size::new(400.0, 300.0));
            ElementInfo::new(ElementId(i + 1), "a")
                .with_attribute("href", format!("full{i}.jpg"))
                .with_rect(Rect::new(x, 20.0, x + 100.0, 95.0))
                .with_child_image(image)
        })
        .collect()
}

pub fn viewer_with(
    source: Source,
    config: ViewerConfig,
    hooks: Hooks,
    host: FakeHost,
    registry: OpenRegistry,
) -> Viewer<FakeHost> {
    Viewer::try_new(source, config, hooks, host, registry).unwrap()
}

pub fn record_viewer(count: usize) -> Viewer<FakeHost> {
    viewer_with(
        Source::Records(records(count)),
        ViewerConfig::default(),
        Hooks::new(),
        FakeHost::default(),
        OpenRegistry::new(),
    )
}

/// Report every pending load as decoded.
pub fn decode_all(viewer: &mut Viewer<FakeHost>) {
    for id in viewer.host_mut().take_loads() {
        viewer.on_media_loaded(id, NATURAL);
    }
}

/// Run `count` frames, advancing the clock by one frame each.
pub fn frames(viewer: &mut Viewer<FakeHost>, count: usize) {
    for _ in 0..count {
        viewer.host_mut().now += FRAME_MS;
        viewer.frame();
    }
}

/// Run frames until the current box is ready.
pub fn until_ready(viewer: &mut Viewer<FakeHost>) {
    for _ in 0..200 {
        if viewer.current_box().is_some_and(|b| b.is_ready()) {
            return;
        }
        frames(viewer, 1);
    }
    panic!("current box never became ready");
}

/// Open at `start`, decode the window and run until the current box is ready.
pub fn open_ready(viewer: &mut Viewer<FakeHost>, start: isize) {
    viewer.open(start);
    decode_all(viewer);
    until_ready(viewer);
}

/// Let every animation finish, and the clock move past every debounce.
pub fn settle(viewer: &mut Viewer<FakeHost>) {
    let ids: Vec<BoxId> = viewer.boxes().iter().map(|b| b.id()).collect();
    for _ in 0..300 {
        frames(viewer, 1);
        if ids.iter().all(|id| !viewer.is_animating(*id)) && !viewer.is_rapid() {
            frames(viewer, 10);
            if ids.iter().all(|id| !viewer.is_animating(*id)) {
                return;
            }
        }
    }
    panic!("animations never settled");
}
