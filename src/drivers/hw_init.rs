//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 channels, the relay GPIO and the servo LEDC
//! timer/channel using raw ESP-IDF sys calls.  Called once from `main()`
//! before the schedule loop starts.
//!
//! The output handles ([`GpioOutput`], [`LedcChannel`]) implement the
//! `embedded-hal` 1.0 traits so the relay and servo drivers stay generic.
//! On the host they only remember the last level / duty written.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::ActuatorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::AdcInitFailed(_) => Self::Init("adc"),
            HwInitError::GpioConfigFailed(_) => Self::Init("gpio"),
            HwInitError::LedcInitFailed(_) => Self::Init("ledc"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the schedule loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// schedule-loop read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: pins::ADC_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::SOIL_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL, pins::LM35_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=soil, CH{}=light, CH{}=lm35)",
        pins::SOIL_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL, pins::LM35_ADC_CHANNEL
    );
    Ok(())
}

/// One 12-bit conversion.  `Err` carries the ESP-IDF return code.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.max(0) as u16)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PUMP_RELAY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: relay GPIO{} configured", pins::PUMP_RELAY_GPIO);
    Ok(())
}

/// A configured push-pull output pin.
#[derive(Debug)]
pub struct GpioOutput {
    pin: i32,
    high: bool,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin, high: false }
    }

    /// Last level written.
    pub fn is_high(&self) -> bool {
        self.high
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self, high: bool) -> Result<(), ActuatorError> {
        // SAFETY: the pin was configured as an output in init_gpio_outputs().
        let ret = unsafe { gpio_set_level(self.pin, u32::from(high)) };
        if ret != ESP_OK as i32 {
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self, _high: bool) -> Result<(), ActuatorError> {
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for GpioOutput {
    type Error = ActuatorError;
}

impl embedded_hal::digital::OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.platform_write(false)?;
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.platform_write(true)?;
        self.high = true;
        Ok(())
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_SERVO: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: servo (50 Hz, 14-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SERVO,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (servo=CH{}, {} Hz)", LEDC_CH_SERVO, pins::SERVO_PWM_FREQ_HZ);
    Ok(())
}

/// A configured LEDC channel driven as an `embedded-hal` PWM output.
#[derive(Debug)]
pub struct LedcChannel {
    channel: u32,
    duty: u16,
}

impl LedcChannel {
    /// Full-scale duty at the configured timer resolution.
    pub const MAX_DUTY: u16 = ((1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1) as u16;

    pub fn new(channel: u32) -> Self {
        Self { channel, duty: 0 }
    }

    /// Last duty written, in timer counts.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self, duty: u16) -> Result<(), ActuatorError> {
        // SAFETY: the channel was configured in init_ledc(); only the
        // schedule loop writes duty registers.
        unsafe {
            if ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel, u32::from(duty))
                != ESP_OK as i32
            {
                return Err(ActuatorError::PwmWriteFailed);
            }
            if ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel) != ESP_OK as i32 {
                return Err(ActuatorError::PwmWriteFailed);
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self, _duty: u16) -> Result<(), ActuatorError> {
        let _ = self.channel;
        Ok(())
    }
}

impl embedded_hal::pwm::ErrorType for LedcChannel {
    type Error = ActuatorError;
}

impl embedded_hal::pwm::SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(Self::MAX_DUTY);
        self.platform_write(duty)?;
        self.duty = duty;
        Ok(())
    }
}
