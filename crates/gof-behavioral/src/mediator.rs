//! Mediator: the phone app never talks to a light directly. It sends text
//! commands to the cloud hub, which routes them to the registered device.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::{BehavioralError, Result};

/// A device reachable through the cloud hub.
pub trait SmartDevice: Send + Sync {
    fn id(&self) -> u32;

    /// Execute a text command.
    fn command(&mut self, cmd: &str) -> Result<()>;

    /// Short human-readable state.
    fn status(&self) -> String;
}

/// Device registry and command router.
#[derive(Default)]
pub struct CloudMediator {
    devices: RwLock<HashMap<u32, Box<dyn SmartDevice>>>,
}

impl CloudMediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device, replacing any device with the same id.
    pub fn register(&self, device: impl SmartDevice + 'static) -> Result<()> {
        let id = device.id();
        self.devices
            .write()
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))?
            .insert(id, Box::new(device));
        debug!(id, "device registered");
        Ok(())
    }

    /// Route `cmd` to device `id`.
    pub fn command(&self, id: u32, cmd: &str) -> Result<()> {
        let mut devices = self
            .devices
            .write()
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))?;
        let device = devices
            .get_mut(&id)
            .ok_or(BehavioralError::DeviceNotFound { id })?;
        device.command(cmd)
    }

    pub fn status(&self, id: u32) -> Result<String> {
        let devices = self
            .devices
            .read()
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))?;
        devices
            .get(&id)
            .map(|d| d.status())
            .ok_or(BehavioralError::DeviceNotFound { id })
    }
}

/// A light understanding `light open`, `light close` and
/// `light switch_mode <n>`.
#[derive(Clone, Debug, Default)]
pub struct SmartLight {
    id: u32,
    open: bool,
    mode: u8,
}

impl SmartLight {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    fn switch_mode(&mut self, cmd: &str) -> Result<()> {
        let invalid = |reason: &str| BehavioralError::InvalidCommand {
            command: cmd.to_string(),
            reason: reason.to_string(),
        };
        let args: Vec<&str> = cmd.split_whitespace().collect();
        let [_, _, mode] = args.as_slice() else {
            return Err(invalid("invalid switch command"));
        };
        self.mode = mode.parse().map_err(|_| invalid("invalid mode number"))?;
        info!(id = self.id, mode = self.mode, "light switch mode");
        Ok(())
    }
}

impl SmartDevice for SmartLight {
    fn id(&self) -> u32 {
        self.id
    }

    fn command(&mut self, cmd: &str) -> Result<()> {
        match cmd {
            "light open" => {
                self.open = true;
                info!(id = self.id, "light open");
                Ok(())
            }
            "light close" => {
                self.open = false;
                info!(id = self.id, "light close");
                Ok(())
            }
            _ if cmd.starts_with("light switch_mode") => self.switch_mode(cmd),
            _ => Err(BehavioralError::UnrecognizedCommand {
                command: cmd.to_string(),
            }),
        }
    }

    fn status(&self) -> String {
        let power = if self.open { "on" } else { "off" };
        format!("light#{} {} mode={}", self.id, power, self.mode)
    }
}

/// The phone app, a colleague that only knows the mediator.
#[derive(Clone)]
pub struct PhoneApp {
    mediator: Arc<CloudMediator>,
}

impl PhoneApp {
    pub fn new(mediator: Arc<CloudMediator>) -> Self {
        Self { mediator }
    }

    pub fn light_open(&self, id: u32) -> Result<()> {
        self.mediator.command(id, "light open")
    }

    pub fn light_close(&self, id: u32) -> Result<()> {
        self.mediator.command(id, "light close")
    }

    pub fn light_switch_mode(&self, id: u32, mode: u8) -> Result<()> {
        self.mediator.command(id, &format!("light switch_mode {mode}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<CloudMediator>, PhoneApp) {
        let hub = Arc::new(CloudMediator::new());
        hub.register(SmartLight::new(1)).unwrap();
        hub.register(SmartLight::new(2)).unwrap();
        let app = PhoneApp::new(Arc::clone(&hub));
        (hub, app)
    }

    #[test]
    fn app_controls_lights_through_hub() {
        let (hub, app) = setup();
        app.light_open(1).unwrap();
        app.light_switch_mode(1, 3).unwrap();
        assert_eq!(hub.status(1).unwrap(), "light#1 on mode=3");
        assert_eq!(hub.status(2).unwrap(), "light#2 off mode=0");
        app.light_close(1).unwrap();
        assert_eq!(hub.status(1).unwrap(), "light#1 off mode=3");
    }

    #[test]
    fn unknown_device() {
        let (_, app) = setup();
        assert!(matches!(
            app.light_open(9),
            Err(BehavioralError::DeviceNotFound { id: 9 })
        ));
    }

    #[test]
    fn malformed_commands() {
        let (hub, _) = setup();
        assert!(matches!(
            hub.command(1, "light.open"),
            Err(BehavioralError::UnrecognizedCommand { .. })
        ));
        match hub.command(1, "light switch_mode") {
            Err(BehavioralError::InvalidCommand { reason, .. }) => {
                assert_eq!(reason, "invalid switch command")
            }
            other => panic!("unexpected: {other:?}"),
        }
        match hub.command(1, "light switch_mode bright") {
            Err(BehavioralError::InvalidCommand { reason, .. }) => {
                assert_eq!(reason, "invalid mode number")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn light_direct_use() {
        let mut light = SmartLight::new(5);
        light.command("light open").unwrap();
        light.command("light switch_mode 2").unwrap();
        assert!(light.is_open());
        assert_eq!(light.mode(), 2);
    }
}
