//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to               |
//! |--------------|--------------------|---------------------------|
//! | `hardware`   | SensorPort         | ESP32 ADC1, DHT11 GPIO    |
//! |              | ActuatorPort       | Relay GPIO, LEDC servo    |
//! | `log_sink`   | EventSink          | Serial log output         |
//! | `mqtt`       | TelemetryPort      | MQTT over mutual TLS      |
//! | `wifi`       | ConnectivityPort   | ESP-IDF WiFi STA          |
//! | `time`       | DelayNs            | FreeRTOS task delay       |
//! | `cert_store` | -                  | NVS `certs` namespace     |
//! | `device_id`  | -                  | eFuse MAC                 |

pub mod cert_store;
pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
