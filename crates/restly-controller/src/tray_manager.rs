//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with two states (Ready, Failed) and the
//! command menu: quick actions, prompts and Quit.

use crate::{AppError, AppResult, MenuAction, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// Menu layout; `None` is a separator.
const MENU_LAYOUT: [Option<MenuAction>; 8] = [
    Some(MenuAction::StartDeepWork),
    Some(MenuAction::RescheduleBreak),
    Some(MenuAction::TogglePause),
    Some(MenuAction::SummarizeDay),
    None,
    Some(MenuAction::CommandPalette),
    None,
    Some(MenuAction::Quit),
];

/// Menu item ids and the action each one triggers.
///
/// `Send`, unlike the tray itself, so it can travel to the async runtime.
#[derive(Debug, Clone, Default)]
pub struct MenuBindings {
    items: Vec<(MenuId, MenuAction)>,
}

impl MenuBindings {
    pub(crate) fn new(items: Vec<(MenuId, MenuAction)>) -> Self {
        Self { items }
    }

    /// Action bound to a clicked menu item.
    pub fn resolve(&self, id: &MenuId) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|(item_id, _)| item_id == id)
            .map(|(_, action)| *action)
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    bindings: MenuBindings,
}

impl TrayManager {
    /// Create the tray icon and its menu in the Ready state.
    #[track_caller]
    #[instrument]
    pub fn new(deep_work_minutes: u32) -> AppResult<Self> {
        let menu = Menu::new();
        let mut items = Vec::new();

        for entry in MENU_LAYOUT {
            let appended = match entry {
                Some(action) => {
                    let item = MenuItem::new(action.label(deep_work_minutes), true, None);
                    items.push((item.id().clone(), action));
                    menu.append(&item)
                }
                None => menu.append(&PredefinedMenuItem::separator()),
            };

            appended.map_err(|e| AppError::TrayError {
                reason: format!("Failed to add menu entry {:?}: {}", entry, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let state = TrayIconState::Ready;
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(Self::render_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            bindings: MenuBindings::new(items),
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::render_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu ids for the async side.
    pub fn bindings(&self) -> MenuBindings {
        self.bindings.clone()
    }

    /// Draw the icon in memory: a filled disc in the state colour.
    #[track_caller]
    fn render_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_pixels(state);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Disc of the state colour on a transparent square.
pub(crate) fn icon_pixels(state: TrayIconState) -> RgbaImage {
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;
    let fill = Rgba(state.rgba());

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let (dx, dy) = (x as f32 - center, y as f32 - center);
        if dx * dx + dy * dy <= radius * radius {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
