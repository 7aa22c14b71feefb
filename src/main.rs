//! RustFencingScorer - firmware entry point
//!
//! Target bring-up only; all scoring logic lives in the library and is
//! exercised by the host test suite. Build with `--features espidf` for
//! the device; the default host build compiles a stub.

use rust_fencing_scorer::event::ButtonQueue;
use rust_fencing_scorer::fault::FaultState;
use rust_fencing_scorer::logging::LogStream;

/// Button events, fed by the GPIO ISRs, drained by the controller tick.
static BUTTONS: ButtonQueue = ButtonQueue::new();

/// Fault latch, checked once per loop iteration.
static FAULT: FaultState = FaultState::new();

/// Log ring, drained by the UART task.
static LOG: LogStream = LogStream::new();

#[cfg(feature = "espidf")]
fn main() {
    use rust_fencing_scorer::box_error;

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    // TODO: wire the real peripherals once the carrier board is final:
    // - touch line + weapon drive lines (pocket) / LEDs + buzzer (desk)
    // - RF24 over SPI, ISRs for the two buttons pushing into BUTTONS
    // - role selection from a strapping pin, then the controller:
    //     pocket: PocketController::new(..., &BUTTONS), tick() below
    //     desk:   DeskController::new(..., &BUTTONS) + start(), tick(now_ms)

    loop {
        let now_ms = (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u32;

        // Controller tick goes here; its send errors land on the fault
        // latch instead of unwinding the loop.
        let tick_result: Result<(), rust_fencing_scorer::radio::LinkError> = Ok(());
        if let Err(err) = tick_result {
            FAULT.set(err.into(), now_ms);
        }

        if FAULT.is_active() {
            box_error!(LOG, now_ms, "fault {:?} data {}", FAULT.code(), FAULT.data());
            FAULT.clear();
        }
        while let Some(entry) = LOG.drain() {
            let text = core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("?");
            log::info!("[{} {}ms] {}", entry.level.as_str(), entry.at_ms, text);
        }
        unsafe {
            esp_idf_svc::sys::vTaskDelay(10);
        }
    }
}

#[cfg(not(feature = "espidf"))]
fn main() {
    // Host build: the firmware loop needs the target runtime. Keep the
    // statics referenced so both build flavors stay honest.
    let _ = (&BUTTONS, &FAULT, &LOG);
    eprintln!("rust-fencing-scorer: build with --features espidf for the target");
}
