//! Macropad firmware for the nRF52840.
//!
//! Interrupt-driven producers (matrix scan, two encoder tasks) write the
//! shared [`InputSnapshot`]. One cooperative main loop then runs, in
//! order: button debouncing, inbound report handling, the 100 Hz HID tick
//! and the 20 Hz UI tick. Both ticks throttle themselves.

#![no_std]
#![no_main]

mod board;
mod usb;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use board::encoder::EncoderRole;
use board::matrix::Matrix;
use board::oled::Oled;
use macropad::config::BUTTON_SETTLE_TIME;
use macropad::debounce::DebounceState;
use macropad::ui::display::{GIT_SHA, VERSION};
use macropad::{on_report_received, HidLayer, InputSnapshot, InputUpdate, Profile, UiStateMachine};
use usb::hid_device::{self, UsbDriver, UsbReportSink, HID_PACKET_SIZE, INBOUND};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static INPUTS: InputSnapshot = InputSnapshot::new();

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_writer_task(writer: embassy_usb::class::hid::HidWriter<'static, UsbDriver, HID_PACKET_SIZE>) -> ! {
    hid_device::hid_writer_task(writer).await
}

#[embassy_executor::task]
async fn matrix_task(matrix: Matrix<'static>) -> ! {
    matrix.run(&INPUTS).await
}

#[embassy_executor::task(pool_size = 2)]
async fn encoder_task(role: EncoderRole, a: Input<'static>, b: Input<'static>) -> ! {
    board::encoder::run(role, a, b, &INPUTS).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("macropad {} ({}) starting", VERSION, GIT_SHA);

    // ── USB ────────────────────────────────────────────────────────────
    let usb = hid_device::init(p.USBD);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(hid_writer_task(usb.writer)));

    // ── Producers ──────────────────────────────────────────────────────
    let rows = [
        Output::new(p.P0_03, Level::High, OutputDrive::Standard),
        Output::new(p.P0_04, Level::High, OutputDrive::Standard),
        Output::new(p.P0_28, Level::High, OutputDrive::Standard),
    ];
    let cols = [
        Input::new(p.P0_29, Pull::Up),
        Input::new(p.P0_30, Pull::Up),
        Input::new(p.P0_31, Pull::Up),
        Input::new(p.P1_15, Pull::Up),
    ];
    unwrap!(spawner.spawn(matrix_task(Matrix::new(rows, cols))));

    unwrap!(spawner.spawn(encoder_task(
        EncoderRole::Navigation,
        Input::new(p.P1_01, Pull::Up),
        Input::new(p.P1_02, Pull::Up),
    )));
    unwrap!(spawner.spawn(encoder_task(
        EncoderRole::Host,
        Input::new(p.P1_04, Pull::Up),
        Input::new(p.P1_05, Pull::Up),
    )));

    // Encoder push-buttons, active low.
    let buttons = [Input::new(p.P1_03, Pull::Up), Input::new(p.P1_06, Pull::Up)];
    let mut button_state = [DebounceState::new(); 2];

    // ── Display ────────────────────────────────────────────────────────
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut panel = unwrap!(Oled::new(i2c));

    let mut ui = UiStateMachine::new(Instant::now());
    if let Err(e) = ui.show_splash(&mut panel) {
        warn!("UI: splash failed: {}", e);
    }

    let mut hid = HidLayer::new();
    let mut profile = Profile::new();
    let mut sink = UsbReportSink;

    info!("Main loop started");

    loop {
        let now = Instant::now();

        for (i, (pin, state)) in buttons.iter().zip(button_state.iter_mut()).enumerate() {
            if state.sample(pin.is_low(), now, BUTTON_SETTLE_TIME) {
                let pressed = state.stable_state();
                let update = if i == 0 {
                    InputUpdate::new().encoder_0_button(pressed)
                } else {
                    InputUpdate::new().encoder_1_button(pressed)
                };
                INPUTS.set(update);
            }
        }

        while let Ok(report) = INBOUND.try_receive() {
            on_report_received(report.report_id, &report.payload, &mut profile, &mut ui, now);
        }

        hid.tick(now, &INPUTS, &mut sink);

        if let Err(e) = ui.tick(now, &INPUTS, &mut hid, &profile, &mut panel) {
            warn!("UI: frame failed: {}", e);
        }

        Timer::after_millis(1).await;
    }
}
