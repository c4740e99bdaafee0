use domain::SdkFault;
use domain::sdk::{
    ConnectCallback, ConnectOptions, CreateDeviceCallback, DeleteDeviceCallback, DeviceHandle,
    DeviceOptions, DeviceSession, DeviceType, EposSdk, PrinterDevice, ResultCode,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// One invocation of an SDK primitive, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Connect {
        host: String,
        port: u16,
        print: bool,
    },
    CreateDevice {
        device_id: String,
        device_type: DeviceType,
        crypto: bool,
        buffer: bool,
    },
    DeleteDevice {
        device_id: String,
    },
    Disconnect,
}

/// Fault injection knobs for the simulator
#[derive(Debug, Clone)]
pub struct SimulatorBehavior {
    pub connect_code: String,
    pub create_device_code: String,
    pub delete_device_code: String,
    /// Raise synchronously from the named primitive
    pub connect_fault: Option<String>,
    pub create_device_fault: Option<String>,
    pub delete_device_fault: Option<String>,
    pub disconnect_fault: Option<String>,
    pub live_check_fault: Option<String>,
    pub session_device_type: Option<DeviceType>,
    /// Drop completion callbacks instead of firing them
    pub suppress_callbacks: bool,
    pub latency: Duration,
}

impl Default for SimulatorBehavior {
    fn default() -> Self {
        Self {
            connect_code: ResultCode::OK.to_string(),
            create_device_code: ResultCode::OK.to_string(),
            delete_device_code: ResultCode::OK.to_string(),
            connect_fault: None,
            create_device_fault: None,
            delete_device_fault: None,
            disconnect_fault: None,
            live_check_fault: None,
            session_device_type: None,
            suppress_callbacks: false,
            latency: Duration::ZERO,
        }
    }
}

struct SimulatorShared {
    behavior: Mutex<SimulatorBehavior>,
    journal: Mutex<Vec<SdkCall>>,
    // Bumped by sever_links; sessions opened under an older epoch are dead
    link_epoch: AtomicU64,
    sessions_created: AtomicUsize,
    next_device: AtomicU64,
}

impl SimulatorShared {
    fn behavior(&self) -> SimulatorBehavior {
        self.behavior
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: SdkCall) {
        debug!(?call, "Simulated SDK call");
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Fire a completion the way the SDK does: later, from the event loop
    fn dispatch(&self, behavior: &SimulatorBehavior, fire: impl FnOnce() + Send + 'static) {
        if behavior.suppress_callbacks {
            return;
        }
        let latency = behavior.latency;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if latency.is_zero() {
                        tokio::task::yield_now().await;
                    } else {
                        tokio::time::sleep(latency).await;
                    }
                    fire();
                });
            }
            Err(_) => fire(),
        }
    }
}

/// In-process stand-in for the vendor printer SDK.
///
/// Cloning shares the journal and behavior, so a test can keep a handle
/// while the manager owns the sessions.
#[derive(Clone)]
pub struct SimulatedSdk {
    shared: Arc<SimulatorShared>,
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self::with_behavior(SimulatorBehavior::default())
    }

    pub fn with_behavior(behavior: SimulatorBehavior) -> Self {
        Self {
            shared: Arc::new(SimulatorShared {
                behavior: Mutex::new(behavior),
                journal: Mutex::new(Vec::new()),
                link_epoch: AtomicU64::new(0),
                sessions_created: AtomicUsize::new(0),
                next_device: AtomicU64::new(1),
            }),
        }
    }

    pub fn configure(&self, update: impl FnOnce(&mut SimulatorBehavior)) {
        let mut behavior = self
            .shared
            .behavior
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut behavior);
    }

    pub fn journal(&self) -> Vec<SdkCall> {
        self.shared
            .journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.journal()
            .iter()
            .filter(|call| matches!(call, SdkCall::Connect { .. }))
            .count()
    }

    pub fn create_device_calls(&self) -> usize {
        self.journal()
            .iter()
            .filter(|call| matches!(call, SdkCall::CreateDevice { .. }))
            .count()
    }

    pub fn sessions_created(&self) -> usize {
        self.shared.sessions_created.load(Ordering::SeqCst)
    }

    /// Every open session starts reporting not-connected
    pub fn sever_links(&self) {
        self.shared.link_epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl EposSdk for SimulatedSdk {
    fn create_session(&self) -> Box<dyn DeviceSession> {
        self.shared.sessions_created.fetch_add(1, Ordering::SeqCst);
        Box::new(SimulatedSession {
            shared: self.shared.clone(),
            live: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
        })
    }

    fn default_device_type(&self) -> DeviceType {
        DeviceType::printer()
    }
}

pub struct SimulatedSession {
    shared: Arc<SimulatorShared>,
    live: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
}

impl DeviceSession for SimulatedSession {
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        options: ConnectOptions,
        callback: ConnectCallback,
    ) -> Result<(), SdkFault> {
        self.shared.record(SdkCall::Connect {
            host: host.to_string(),
            port,
            print: options.print,
        });
        let behavior = self.shared.behavior();
        if let Some(fault) = &behavior.connect_fault {
            return Err(SdkFault::new(fault.clone()));
        }

        let code = ResultCode::new(behavior.connect_code.clone());
        let live = self.live.clone();
        let epoch = self.epoch.clone();
        let shared = self.shared.clone();
        self.shared.dispatch(&behavior, move || {
            if code.is_connect_success() {
                epoch.store(shared.link_epoch.load(Ordering::SeqCst), Ordering::SeqCst);
                live.store(true, Ordering::SeqCst);
            }
            callback(code);
        });
        Ok(())
    }

    fn create_device(
        &mut self,
        device_id: &str,
        device_type: &DeviceType,
        options: DeviceOptions,
        callback: CreateDeviceCallback,
    ) -> Result<(), SdkFault> {
        self.shared.record(SdkCall::CreateDevice {
            device_id: device_id.to_string(),
            device_type: device_type.clone(),
            crypto: options.crypto,
            buffer: options.buffer,
        });
        let behavior = self.shared.behavior();
        if let Some(fault) = &behavior.create_device_fault {
            return Err(SdkFault::new(fault.clone()));
        }

        let code = ResultCode::new(behavior.create_device_code.clone());
        let device: Option<DeviceHandle> = code.is_ok().then(|| {
            Arc::new(SimulatedDevice {
                device_id: device_id.to_string(),
                device_type: device_type.clone(),
                serial: self.shared.next_device.fetch_add(1, Ordering::SeqCst),
            }) as DeviceHandle
        });
        self.shared
            .dispatch(&behavior, move || callback(device, code));
        Ok(())
    }

    fn delete_device(
        &mut self,
        device: &DeviceHandle,
        callback: DeleteDeviceCallback,
    ) -> Result<(), SdkFault> {
        self.shared.record(SdkCall::DeleteDevice {
            device_id: device.device_id().to_string(),
        });
        let behavior = self.shared.behavior();
        if let Some(fault) = &behavior.delete_device_fault {
            return Err(SdkFault::new(fault.clone()));
        }

        let code = ResultCode::new(behavior.delete_device_code.clone());
        self.shared.dispatch(&behavior, move || callback(code));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), SdkFault> {
        self.shared.record(SdkCall::Disconnect);
        self.live.store(false, Ordering::SeqCst);
        match self.shared.behavior().disconnect_fault {
            Some(fault) => Err(SdkFault::new(fault)),
            None => Ok(()),
        }
    }

    fn is_connected(&self) -> Result<bool, SdkFault> {
        if let Some(fault) = self.shared.behavior().live_check_fault {
            return Err(SdkFault::new(fault));
        }
        let current = self.shared.link_epoch.load(Ordering::SeqCst);
        Ok(self.live.load(Ordering::SeqCst) && self.epoch.load(Ordering::SeqCst) == current)
    }

    fn default_device_type(&self) -> Option<DeviceType> {
        self.shared.behavior().session_device_type
    }
}

#[derive(Debug)]
pub struct SimulatedDevice {
    device_id: String,
    device_type: DeviceType,
    serial: u64,
}

impl SimulatedDevice {
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl PrinterDevice for SimulatedDevice {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn device_type(&self) -> &DeviceType {
        &self.device_type
    }
}
