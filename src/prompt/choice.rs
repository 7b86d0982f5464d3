use super::{closed, dismissed, failed, PickItem, QuickPickOptions};
use crate::{
    error::Result,
    flow::{engine::ActiveSurface, MultiStepInput},
    surface::{ItemView, SurfaceEvent},
};

impl MultiStepInput {
    /// Shows a selectable list and resolves with the item the user picks.
    pub async fn show_quick_pick<T: PickItem>(&mut self, options: QuickPickOptions<T>) -> Result<T> {
        let QuickPickOptions {
            title,
            step,
            total_steps,
            items,
            active_item,
            placeholder,
            buttons,
            ignore_focus_out,
            should_resume,
        } = options;

        let views: Vec<ItemView> = items.iter().map(PickItem::view).collect();
        let mut surface = self.provider().create_quick_pick();
        surface.set_title(title.as_deref());
        surface.set_step(Some(step));
        surface.set_total_steps(Some(total_steps));
        surface.set_placeholder(placeholder.as_deref());
        surface.set_ignore_focus_out(ignore_focus_out);
        surface.set_items(&views);
        if let Some(active) = active_item {
            let label = active.label();
            if let Some(index) = views.iter().position(|view| view.label == label) {
                surface.set_active_items(&[index]);
            }
        }
        surface.set_buttons(&self.button_specs(&buttons));

        let mut events = surface.subscribe();
        self.install(ActiveSurface::QuickPick(surface));

        while let Some(event) = events.recv().await {
            log::trace!("Quick pick event: {event:?}");
            match event {
                SurfaceEvent::SelectionChanged(selected) => {
                    if let Some(item) = selected.first().and_then(|&index| items.get(index)) {
                        return Ok(item.clone());
                    }
                }
                SurfaceEvent::ButtonTriggered(id) => self.trigger_button(id, &buttons)?,
                SurfaceEvent::Hidden => return Err(dismissed(&should_resume).await),
                SurfaceEvent::Failed(reason) => return failed(reason),
                SurfaceEvent::ValueChanged(_) | SurfaceEvent::Accepted => {}
            }
        }
        closed()
    }
}
