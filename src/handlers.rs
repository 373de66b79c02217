//! Message handlers for the UIAT session.
//!
//! Each handler processes one kind of message against the session workspace,
//! keeping `Session::update` a plain dispatch.

use crate::error::AnnotationError;
use crate::model::{BoundingBox, ImageRecord, Point, Tag};
use crate::session::Workspace;
use crate::state::Direction;

/// Replace the loaded batch and reset navigation and interaction.
pub fn handle_load(ws: &mut Workspace, images: Vec<ImageRecord>) {
    ws.store.initialize(&images);
    ws.interaction.reset();
    log::info!("Loaded {} images", images.len());
    ws.images = images;
}

/// Pointer pressed: select the box under the pointer or start drawing.
pub fn handle_pointer_down(ws: &mut Workspace, point: Point) -> Result<(), AnnotationError> {
    let name = ws.require_active()?.name.clone();
    ws.interaction.pointer_down(point, ws.store.boxes(&name));
    Ok(())
}

pub fn handle_pointer_move(ws: &mut Workspace, point: Point) {
    ws.interaction.pointer_move(point);
}

/// Pointer released: commit the draft if it is large enough.
pub fn handle_pointer_up(ws: &mut Workspace) -> Result<(), AnnotationError> {
    let Some(rect) = ws.interaction.pointer_up() else {
        return Ok(());
    };
    let name = ws.require_active()?.name.clone();
    let bbox = BoundingBox::new(ws.ids.next_id(), rect, ws.interaction.active_tag);
    log::info!(
        "Created {} box {} at ({:.1}, {:.1}) {:.1}x{:.1}",
        bbox.tag,
        bbox.id,
        bbox.x,
        bbox.y,
        bbox.width,
        bbox.height
    );
    ws.store.add_box(&name, bbox)
}

pub fn handle_pointer_leave(ws: &mut Workspace) {
    ws.interaction.pointer_leave();
}

/// Move to the previous or next image. Selection and draft are always dropped.
pub fn handle_navigation(ws: &mut Workspace, direction: Direction) {
    let count = ws.images.len();
    if !ws.interaction.navigate(direction, count) {
        log::debug!(
            "Navigation {:?} clamped at image {}",
            direction,
            ws.interaction.active_index()
        );
    }
}

pub fn handle_select_tag(ws: &mut Workspace, tag: Tag) {
    ws.interaction.active_tag = tag;
    log::debug!("Active tag: {}", tag);
}

/// Active image name, with the selection dropped if its box is gone.
fn active_with_selection(ws: &mut Workspace) -> Option<String> {
    let name = ws.active_image()?.name.clone();
    ws.interaction.retain_selection(ws.store.boxes(&name));
    Some(name)
}

/// Change the selected box's tag. No-op without a selection.
pub fn handle_retag_selected(ws: &mut Workspace, tag: Tag) -> Result<(), AnnotationError> {
    let name = active_with_selection(ws);
    let (Some(name), Some(id)) = (name, ws.interaction.selected()) else {
        log::debug!("Retag ignored: nothing selected");
        return Ok(());
    };
    ws.store.update_box_tag(&name, id, tag)
}

/// Delete the selected box and clear the selection. No-op without a selection.
pub fn handle_delete_selected(ws: &mut Workspace) -> Result<(), AnnotationError> {
    let name = active_with_selection(ws);
    let (Some(name), Some(id)) = (name, ws.interaction.selected()) else {
        log::debug!("Delete ignored: nothing selected");
        return Ok(());
    };
    ws.store.delete_box(&name, id)?;
    ws.interaction.clear();
    Ok(())
}

pub fn handle_toggle_boxes(ws: &mut Workspace) {
    ws.interaction.show_boxes = !ws.interaction.show_boxes;
    log::debug!("Boxes visible: {}", ws.interaction.show_boxes);
}
