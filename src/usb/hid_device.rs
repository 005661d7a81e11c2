//! USB HID device - keypad, encoder and profile configuration reports.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one HID interface with an IN endpoint and a
//! SET_REPORT handler.

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, pac, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use heapless::{String, Vec};
use static_cell::StaticCell;

use macropad::config;
use macropad::hid::descriptor::MACROPAD_REPORT_DESCRIPTOR;
use macropad::hid::{ReportSink, MAX_REPORT_SIZE};
use macropad::Error;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Endpoint size; one report id byte plus the largest input report.
pub const HID_PACKET_SIZE: usize = 8;

/// Largest SET_REPORT payload we accept, report id byte included.
pub const MAX_CONFIG_REPORT_LEN: usize = config::KEY_LABELS_REPORT_LEN;

/// A SET_REPORT request as received, report id byte included in `payload`.
pub struct InboundReport {
    pub report_id: u8,
    pub payload: Vec<u8, MAX_CONFIG_REPORT_LEN>,
}

struct OutboundReport {
    report_id: u8,
    data: Vec<u8, MAX_REPORT_SIZE>,
}

/// SET_REPORT requests waiting for the main loop.
pub static INBOUND: Channel<CriticalSectionRawMutex, InboundReport, 4> = Channel::new();
static OUTBOUND: Channel<CriticalSectionRawMutex, OutboundReport, 8> = Channel::new();

static CONFIGURED: AtomicBool = AtomicBool::new(false);
static SUSPENDED: AtomicBool = AtomicBool::new(false);

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_SERIAL: StaticCell<String<16>> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<ConfigRequestHandler> = StaticCell::new();

/// Tracks whether the host can take reports.
struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Relaxed);
        info!("USB: configured={}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Relaxed);
        info!("USB: suspended={}", suspended);
    }

    fn reset(&mut self) {
        CONFIGURED.store(false, Ordering::Relaxed);
    }
}

/// Queues SET_REPORT payloads for [`macropad::on_report_received`].
///
/// Every request is accepted: validation happens in the main loop and
/// the host gets no negative acknowledgement.
struct ConfigRequestHandler;

impl RequestHandler for ConfigRequestHandler {
    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let report_id = match id {
            ReportId::In(id) | ReportId::Out(id) | ReportId::Feature(id) => id,
        };

        match Vec::from_slice(data) {
            Ok(payload) => {
                if INBOUND.try_send(InboundReport { report_id, payload }).is_err() {
                    warn!("USB: inbound queue full, report {} dropped", report_id);
                }
            }
            Err(()) => warn!("USB: report {} too long ({} bytes)", report_id, data.len()),
        }
        OutResponse::Accepted
    }
}

/// [`ReportSink`] over the outbound queue. A full queue counts as the
/// transport refusing the report.
pub struct UsbReportSink;

impl ReportSink for UsbReportSink {
    fn is_ready(&self) -> bool {
        CONFIGURED.load(Ordering::Relaxed) && !SUSPENDED.load(Ordering::Relaxed)
    }

    fn send(&mut self, report_id: u8, report: &[u8]) -> Result<(), Error> {
        if !self.is_ready() {
            return Err(Error::TransportNotReady);
        }
        let data = Vec::from_slice(report).map_err(|_| Error::BufferOverflow)?;
        OUTBOUND
            .try_send(OutboundReport { report_id, data })
            .map_err(|_| Error::TransportFull)
    }
}

/// Build result containing the USB device runner and the HID writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: HidWriter<'static, UsbDriver, HID_PACKET_SIZE>,
}

/// Serial number string from the factory-programmed device id.
fn serial_number() -> String<16> {
    let id = (u64::from(pac::FICR.deviceid(1).read()) << 32) | u64::from(pac::FICR.deviceid(0).read());
    let mut serial = String::new();
    let _ = write!(serial, "{:016X}", id);
    serial
}

/// Initialise the USB stack and create the HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let serial: &'static String<16> = USB_SERIAL.init(serial_number());

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(serial.as_str());
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    // Must hold the 49-byte key label report.
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(USB_STATE_HANDLER.init(UsbStateHandler));

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: MACROPAD_REPORT_DESCRIPTOR,
        request_handler: Some(REQUEST_HANDLER.init(ConfigRequestHandler)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: HID_PACKET_SIZE as u16,
    };
    let writer = HidWriter::new(&mut builder, hid_state, hid_config);

    let device = builder.build();

    info!("USB HID device initialised (serial {})", serial.as_str());

    UsbHidDevice { device, writer }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Write queued reports to the IN endpoint, prefixed with their id.
pub async fn hid_writer_task(mut writer: HidWriter<'static, UsbDriver, HID_PACKET_SIZE>) -> ! {
    info!("HID writer task started");

    let mut buf = [0u8; 1 + MAX_REPORT_SIZE];

    loop {
        let report = OUTBOUND.receive().await;

        buf[0] = report.report_id;
        let len = 1 + report.data.len();
        buf[1..len].copy_from_slice(&report.data);

        if let Err(_e) = writer.write(&buf[..len]).await {
            warn!("USB: write of report {} failed", report.report_id);
        }
    }
}
