//! System tray icon with state-based updates.
//!
//! Shows the submission status (Idle, Correcting, Failed) and offers a
//! context menu with Open Editor and Exit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    open_editor_item_id: MenuId,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager in the Idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let open_editor_item = MenuItem::new("Open Editor", true, None);
        let separator = PredefinedMenuItem::separator();
        let exit_item = MenuItem::new("Exit", true, None);

        let open_editor_id = open_editor_item.id().clone();
        let exit_id = exit_item.id().clone();

        menu.append_items(&[&open_editor_item, &separator, &exit_item])
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to build tray menu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(TrayIconState::Idle))
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(TrayIconState::Idle)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            open_editor_item_id: open_editor_id,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip(state)))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Render a filled circle in the state's color.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let [r, g, b] = icon_color(state);
        let radius = ICON_SIZE as f32 / 2.0 - 1.0;
        let center = ICON_SIZE as f32 / 2.0 - 0.5;

        let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
        for y in 0..ICON_SIZE {
            for x in 0..ICON_SIZE {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let alpha = if dx * dx + dy * dy <= radius * radius {
                    0xFF
                } else {
                    0x00
                };
                rgba.extend_from_slice(&[r, g, b, alpha]);
            }
        }

        Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get the Open Editor menu item ID.
    pub fn open_editor_item_id(&self) -> &MenuId {
        &self.open_editor_item_id
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}

fn icon_color(state: TrayIconState) -> [u8; 3] {
    match state {
        TrayIconState::Idle => [0x14, 0xB8, 0xA6],
        TrayIconState::Correcting => [0xF5, 0x9E, 0x0B],
        TrayIconState::Failed => [0xDC, 0x26, 0x26],
    }
}

fn tooltip(state: TrayIconState) -> &'static str {
    match state {
        TrayIconState::Idle => "Grammaringer - Ready",
        TrayIconState::Correcting => "Grammaringer - Correcting...",
        TrayIconState::Failed => "Grammaringer - Last correction failed",
    }
}
