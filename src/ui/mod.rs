//! User interface subsystem - OLED display driven by encoder 0.
//!
//! The UI runs as a 20 Hz frame loop owned by the main loop. Each frame
//! it polls the [`InputSnapshot`], applies display power policy, feeds
//! encoder 0's rotation and button release to the current screen, then
//! redraws.
//!
//! ## Screens
//!
//! - **Version**: firmware name and build (initial screen)
//! - **InputDebug**: live key grid and encoder values
//! - **Menu**: Debug / USBConf / Version
//! - **UsbConfig**: enable or disable HID event reports
//! - **ProfileName**: shown for 700 ms when the host selects a profile
//! - **Keymap**: key labels of the current profile

pub mod display;
pub mod input_logic;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::BinaryColor;

use crate::config::{PROFILE_OVERLAY_TIMEOUT, UI_FRAME_INTERVAL};
use crate::error::Error;
use crate::hid::{HidLayer, ProfileObserver};
use crate::input::{InputSnapshot, InputState};
use crate::power::{DisplayPower, PowerChange};
use crate::profile::Profile;
use crate::throttle::Throttle;
use display::Panel;
use input_logic::{cycle_selection, NavInput};

/// Entries of the main menu, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    InputDebug,
    UsbConfig,
    Version,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::InputDebug, MenuItem::UsbConfig, MenuItem::Version];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Index of this entry in [`MenuItem::ALL`].
    pub fn index(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            MenuItem::InputDebug => "Debug",
            MenuItem::UsbConfig => "USBConf",
            MenuItem::Version => "Version",
        }
    }
}

const MENU_LABELS: [&str; 3] = [
    MenuItem::InputDebug.label(),
    MenuItem::UsbConfig.label(),
    MenuItem::Version.label(),
];

/// Choices on the USB config screen: Enable, then Disable.
const USB_CONFIG_ENABLE: u8 = 0;
const USB_CONFIG_CHOICES: u8 = 2;

/// Screens (views) the UI can be in.
///
/// The menu and USB config cursors belong to the session, not to a visit
/// of the screen, so they live on [`UiStateMachine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Version,
    InputDebug,
    Menu,
    UsbConfig,
    /// Transient; switches to [`Screen::Keymap`] at `dismiss_at`.
    ProfileName { dismiss_at: Instant },
    Keymap,
}

/// The UI state machine. Owned by the main loop.
pub struct UiStateMachine {
    screen: Screen,
    /// Menu cursor, kept across visits.
    menu_index: u8,
    /// USB config cursor, kept across visits.
    usb_config_index: u8,
    power: DisplayPower,
    /// State from the previous frame, for edge detection.
    previous: InputState,
    /// State polled this frame, drawn by the input screens.
    current: InputState,
    /// A profile change arrived since the last frame.
    profile_activity: bool,
    throttle: Throttle,
}

impl UiStateMachine {
    /// Start on the version screen with the panel lit.
    pub fn new(now: Instant) -> Self {
        Self {
            screen: Screen::Version,
            menu_index: 0,
            usb_config_index: 0,
            power: DisplayPower::new(now),
            previous: InputState::default(),
            current: InputState::default(),
            profile_activity: false,
            throttle: Throttle::new(UI_FRAME_INTERVAL),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Highlighted entry of the main menu.
    pub fn menu_selection(&self) -> MenuItem {
        MenuItem::from_index(self.menu_index).unwrap_or(MenuItem::InputDebug)
    }

    /// Highlighted choice on the USB config screen; 0 is Enable.
    pub fn usb_config_selection(&self) -> u8 {
        self.usb_config_index
    }

    pub fn is_display_powered(&self) -> bool {
        self.power.is_powered()
    }

    /// Power the panel and show the boot splash.
    pub fn show_splash<P: Panel>(&mut self, panel: &mut P) -> Result<(), Error> {
        panel.set_powered(true)?;
        panel.clear(BinaryColor::Off).map_err(|_| Error::Display)?;
        display::draw_splash(panel).map_err(|_| Error::Display)?;
        panel.flush()
    }

    /// One frame of the 20 Hz UI loop. Returns immediately if not due.
    ///
    /// Input handling and the edge-detection baseline always advance, even
    /// if the panel reports an error; the first error is returned.
    pub fn tick<P: Panel>(
        &mut self,
        now: Instant,
        inputs: &InputSnapshot,
        hid: &mut HidLayer,
        profile: &Profile,
        panel: &mut P,
    ) -> Result<(), Error> {
        if !self.throttle.is_due(now) {
            return Ok(());
        }

        let (current, changed) = inputs.poll();
        self.current = current;

        let activity = changed || core::mem::take(&mut self.profile_activity);
        let power_result = match self.power.update(activity, now) {
            Some(PowerChange::Wake) => panel.set_powered(true),
            Some(PowerChange::Sleep) => panel.set_powered(false),
            None => Ok(()),
        };

        let mut dismissed = false;
        if let Screen::ProfileName { dismiss_at } = self.screen {
            if now >= dismiss_at {
                self.screen = Screen::Keymap;
                dismissed = true;
            }
        }

        // Input seen on the dismissal frame belongs to the overlay.
        if !dismissed {
            let nav = NavInput::between(&self.previous, &current);
            self.handle_input(nav, hid);
        }
        let draw_result = self.draw(hid, profile, panel);

        self.previous = current;
        power_result.and(draw_result)
    }

    fn handle_input(&mut self, nav: NavInput, hid: &mut HidLayer) {
        let next = match self.screen {
            Screen::Version | Screen::InputDebug | Screen::Keymap => {
                if nav.button_falling {
                    Screen::Menu
                } else {
                    self.screen
                }
            }
            Screen::Menu => {
                self.menu_index =
                    cycle_selection(self.menu_index, nav.encoder_delta, MenuItem::ALL.len() as u8);
                if nav.button_falling {
                    match MenuItem::from_index(self.menu_index) {
                        Some(MenuItem::InputDebug) => Screen::InputDebug,
                        Some(MenuItem::UsbConfig) => Screen::UsbConfig,
                        Some(MenuItem::Version) => Screen::Version,
                        None => {
                            warn!("UI: unknown menu item {}", self.menu_index);
                            Screen::Menu
                        }
                    }
                } else {
                    Screen::Menu
                }
            }
            Screen::UsbConfig => {
                self.usb_config_index =
                    cycle_selection(self.usb_config_index, nav.encoder_delta, USB_CONFIG_CHOICES);
                if nav.button_falling {
                    hid.set_event_sending_enabled(self.usb_config_index == USB_CONFIG_ENABLE);
                    Screen::Menu
                } else {
                    Screen::UsbConfig
                }
            }
            // The overlay ignores input until it times out.
            Screen::ProfileName { .. } => self.screen,
        };

        if next != self.screen {
            debug!("UI: {} -> {}", self.screen, next);
        }
        self.screen = next;
    }

    fn draw<P: Panel>(&self, hid: &HidLayer, profile: &Profile, panel: &mut P) -> Result<(), Error> {
        panel.clear(BinaryColor::Off).map_err(|_| Error::Display)?;

        match self.screen {
            Screen::Version => display::draw_version(panel),
            Screen::InputDebug => display::draw_input_debug(panel, &self.current),
            Screen::Menu => display::draw_menu(panel, &MENU_LABELS, self.menu_index as usize),
            Screen::UsbConfig => display::draw_usb_config(
                panel,
                hid.is_event_sending_enabled(),
                self.usb_config_index as usize,
            ),
            Screen::ProfileName { .. } => display::draw_profile_name(panel, profile),
            Screen::Keymap => display::draw_keymap(panel, profile, &self.current),
        }
        .map_err(|_| Error::Display)?;

        panel.flush()
    }
}

impl ProfileObserver for UiStateMachine {
    /// Show the new profile's name, then its keymap.
    ///
    /// Skipped while on InputDebug or UsbConfig so an ongoing check or
    /// configuration is not interrupted.
    fn on_profile_changed(&mut self, now: Instant) {
        match self.screen {
            Screen::Version | Screen::Menu | Screen::ProfileName { .. } | Screen::Keymap => {
                self.screen = Screen::ProfileName {
                    dismiss_at: now + PROFILE_OVERLAY_TIMEOUT,
                };
                self.profile_activity = true;
            }
            Screen::InputDebug | Screen::UsbConfig => {
                debug!("UI: profile change not shown on {}", self.screen);
            }
        }
    }
}
