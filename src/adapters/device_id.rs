//! Device identity derived from the ESP32 factory MAC address.
//!
//! The MQTT client id is the full 6-byte MAC in lowercase hex
//! (e.g. `deadbeefcafe`).  It is deterministic across reboots
//! (factory-burned eFuse MAC) and unique per board.

use core::fmt::Write;

/// Twelve hex digits.
pub type ClientIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Broker client id for `mac`.
pub fn client_id(mac: &MacAddress) -> ClientIdString {
    let mut id = ClientIdString::new();
    for b in mac {
        let _ = write!(id, "{:02x}", b);
    }
    id
}
