use ahash::AHashMap;
use log::{debug, warn};
use sdl2::controller::GameController;
use sdl2::event::Event;
use sdl2::joystick::{HatState, Joystick};
use sdl2::{EventPump, GameControllerSubsystem, JoystickSubsystem, Sdl, VideoSubsystem};

use crate::events::RawEvent;
use crate::key::KeyCode;
use crate::types::{DeviceInfo, HatDirection, HatMask, InstanceId};
use crate::{DeviceError, Result};

const AXIS_SCALE: f32 = i16::MAX as f32;

/// SDL2-backed source of [`RawEvent`]s.
///
/// SDL must live entirely on the thread that created it, so the source is
/// polled from the tick loop instead of running its own thread.
pub struct SdlEventSource {
    _sdl: Sdl,
    joystick: JoystickSubsystem,
    controller: GameControllerSubsystem,
    _video: Option<VideoSubsystem>,
    pump: EventPump,
    joysticks: AHashMap<InstanceId, Joystick>,
    controllers: AHashMap<InstanceId, GameController>,
    screen_height: f32,
    pending: Vec<RawEvent>,
}

impl SdlEventSource {
    /// Initialize SDL and enumerate the devices already plugged in.
    ///
    /// Video is optional. Without it there is no screen size and no pointer
    /// or keyboard events, only devices.
    pub fn new() -> Result<Self> {
        sdl2::hint::set("SDL_JOYSTICK_ALLOW_BACKGROUND_EVENTS", "1");

        let sdl = sdl2::init().map_err(DeviceError::BackendInit)?;
        let joystick = sdl.joystick().map_err(DeviceError::BackendInit)?;
        let controller = sdl.game_controller().map_err(DeviceError::BackendInit)?;
        let video = match sdl.video() {
            Ok(video) => Some(video),
            Err(e) => {
                warn!("video subsystem unavailable: {e}");
                None
            }
        };
        let pump = sdl.event_pump().map_err(DeviceError::BackendInit)?;

        let mut source = Self {
            _sdl: sdl,
            joystick,
            controller,
            _video: None,
            pump,
            joysticks: AHashMap::new(),
            controllers: AHashMap::new(),
            screen_height: 0.0,
            pending: Vec::new(),
        };

        if let Some(video) = &video {
            if let Ok(mode) = video.desktop_display_mode(0) {
                source.screen_height = mode.h as f32;
                source.pending.push(RawEvent::ScreenResized {
                    width: mode.w as f32,
                    height: mode.h as f32,
                });
            }
        }
        source._video = video;

        let count = source
            .joystick
            .num_joysticks()
            .map_err(DeviceError::BackendInit)?;
        for index in 0..count {
            source.open(index);
        }
        Ok(source)
    }

    /// Drain every event queued since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<RawEvent> {
        let mut events = std::mem::take(&mut self.pending);
        let queued: Vec<Event> = self.pump.poll_iter().collect();
        for event in queued {
            self.translate(event, &mut events);
        }
        events
    }

    fn translate(&mut self, event: Event, out: &mut Vec<RawEvent>) {
        match event {
            Event::JoyDeviceAdded { which, .. } => {
                if let Some(info) = self.open_info(which) {
                    out.push(RawEvent::DeviceAdded(info));
                }
            }
            Event::JoyDeviceRemoved { which, .. } => {
                self.joysticks.remove(&which);
                self.controllers.remove(&which);
                out.push(RawEvent::DeviceRemoved(which));
            }
            Event::ControllerDeviceRemapped { which, .. } => {
                let mapping = self.controllers.get(&which).map(GameController::mapping);
                out.push(RawEvent::DeviceRemapped {
                    instance: which,
                    mapping,
                });
            }
            Event::JoyButtonDown {
                which, button_idx, ..
            } => out.push(RawEvent::ButtonDown {
                instance: which,
                button: u16::from(button_idx),
            }),
            Event::JoyButtonUp {
                which, button_idx, ..
            } => out.push(RawEvent::ButtonUp {
                instance: which,
                button: u16::from(button_idx),
            }),
            Event::JoyHatMotion {
                which,
                hat_idx,
                state,
                ..
            } => out.push(RawEvent::HatMotion {
                instance: which,
                hat: u16::from(hat_idx),
                directions: hat_mask(state),
            }),
            Event::JoyAxisMotion {
                which,
                axis_idx,
                value,
                ..
            } => out.push(RawEvent::AxisMotion {
                instance: which,
                axis: u16::from(axis_idx),
                value: (f32::from(value) / AXIS_SCALE).clamp(-1.0, 1.0),
            }),
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => {
                if let Ok(key) = keycode.name().parse::<KeyCode>() {
                    out.push(RawEvent::KeyDown(key));
                }
            }
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => {
                if let Ok(key) = keycode.name().parse::<KeyCode>() {
                    out.push(RawEvent::KeyUp(key));
                }
            }
            Event::MouseMotion { x, y, .. } => out.push(RawEvent::PointerMotion {
                x: x as f32,
                // SDL reports top-left origin.
                y: self.screen_height - y as f32,
            }),
            _ => {}
        }
    }

    fn open(&mut self, index: u32) {
        if let Some(info) = self.open_info(index) {
            self.pending.push(RawEvent::DeviceAdded(info));
        }
    }

    fn open_info(&mut self, index: u32) -> Option<DeviceInfo> {
        let joystick = match self.joystick.open(index) {
            Ok(joystick) => joystick,
            Err(e) => {
                warn!("failed to open joystick {index}: {e}");
                return None;
            }
        };
        let instance = joystick.instance_id();
        // Devices enumerated at startup are reported again by SDL.
        if self.joysticks.contains_key(&instance) {
            return None;
        }

        let mut mapping = None;
        let is_game_controller = self.controller.is_game_controller(index);
        if is_game_controller {
            match self.controller.open(index) {
                Ok(controller) => {
                    mapping = Some(controller.mapping());
                    self.controllers.insert(instance, controller);
                }
                Err(e) => debug!("no controller mapping for joystick {index}: {e}"),
            }
        }

        let info = DeviceInfo {
            id: joystick.guid().string().as_str().into(),
            instance,
            name: joystick.name(),
            is_game_controller,
            axes: clamp_count(joystick.num_axes()),
            balls: clamp_count(joystick.num_balls()),
            hats: clamp_count(joystick.num_hats()),
            buttons: clamp_count(joystick.num_buttons()),
            mapping,
        };
        self.joysticks.insert(instance, joystick);
        Some(info)
    }
}

fn clamp_count(count: u32) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

fn hat_mask(state: HatState) -> HatMask {
    let bits = match state {
        HatState::Centered => 0,
        HatState::Up => HatDirection::Up.bit(),
        HatState::Right => HatDirection::Right.bit(),
        HatState::Down => HatDirection::Down.bit(),
        HatState::Left => HatDirection::Left.bit(),
        HatState::RightUp => HatDirection::Right.bit() | HatDirection::Up.bit(),
        HatState::RightDown => HatDirection::Right.bit() | HatDirection::Down.bit(),
        HatState::LeftUp => HatDirection::Left.bit() | HatDirection::Up.bit(),
        HatState::LeftDown => HatDirection::Left.bit() | HatDirection::Down.bit(),
    };
    HatMask::from_bits(bits)
}
