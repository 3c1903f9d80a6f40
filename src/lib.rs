#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! An embedded async driver for the AXP192 power management IC with charger, DC-DC converters,
//! LDOs and a multi-channel ADC

use embedded_hal_async::i2c::I2c;

mod fields;

pub use fields::{
    AdcChannel, AdcSampleRate, ChargeCurrent, ChargeEndCurrent, ChargeStatus, ChargeVoltage,
    Field, FieldValue, GpioFunction, GpioPin, PowerOutput, SwitchMode, TsCurrent, TsFunction,
    TsOutputMode,
};

const ADDR: u8 = 0x34;

/// A device register address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Reg(pub u8);

impl Reg {
    /// Power mode and charge status
    pub const CHARGE_STATUS: Reg = Reg(0x01);
    /// DC-DC, LDO and EXTEN switch control
    pub const POWER_OUTPUT_CONTROL: Reg = Reg(0x12);
    /// Charge enable, target voltage, end current and charge current
    pub const CHARGE_CONTROL_1: Reg = Reg(0x33);
    /// External path charge current and charge timers
    pub const CHARGE_CONTROL_2: Reg = Reg(0x34);
    /// Battery voltage, high 8 bits
    pub const BATTERY_VOLTAGE_H: Reg = Reg(0x78);
    /// Battery charge current, high 8 bits
    pub const BATTERY_CHARGE_CURRENT_H: Reg = Reg(0x7a);
    /// Battery discharge current, high 8 bits
    pub const BATTERY_DISCHARGE_CURRENT_H: Reg = Reg(0x7c);
    /// ADC enable 1
    pub const ADC_ENABLE_1: Reg = Reg(0x82);
    /// ADC enable 2
    pub const ADC_ENABLE_2: Reg = Reg(0x83);
    /// ADC sample rate and TS pin control
    pub const ADC_SAMPLE_RATE_TS: Reg = Reg(0x84);
    /// GPIO1 function
    pub const GPIO1_CONTROL: Reg = Reg(0x92);
    /// GPIO2 function
    pub const GPIO2_CONTROL: Reg = Reg(0x93);

    /// Create a `Reg` from a raw address
    pub const fn new(val: u8) -> Self {
        Reg(val)
    }

    /// The raw address
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    /// The register following this one
    const fn next(self) -> Self {
        Reg(self.0 + 1)
    }
}

/// Driver errors
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error<E> {
    /// The I2C transaction failed. The operation stopped at that transaction; a write that failed
    /// after its data byte may already have reached the device.
    I2c(E),
    /// A raw field code does not name a legal value. Nothing was written.
    InvalidParameter,
}

/// How read-modify-write operations merge new bits into a register.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum UpdatePolicy {
    #[default]
    /// Bit-compatible with the vendor reference firmware.
    ///
    /// Switching a bit off XORs it, so switching off a bit that is already clear sets it. Field
    /// updates OR the new pattern into the register without clearing the field first, so a
    /// previously set bit inside the field survives.
    Legacy,
    /// Switching a bit off clears it, and field updates clear the field before writing the new
    /// pattern.
    ClearFirst,
}

/// An AXP192 power management IC.
pub struct Axp192<D> {
    i2c_dev: D,
    policy: UpdatePolicy,
    status: ChargeStatus,
}

impl<D: I2c> Axp192<D> {
    /// Create a new `Axp192` using [`UpdatePolicy::Legacy`]
    pub fn new(i2c_dev: D) -> Self {
        Self::with_policy(i2c_dev, UpdatePolicy::Legacy)
    }

    /// Create a new `Axp192` with the given [`UpdatePolicy`]
    pub fn with_policy(i2c_dev: D, policy: UpdatePolicy) -> Self {
        Axp192 {
            i2c_dev,
            policy,
            status: ChargeStatus::new(),
        }
    }

    /// The [`UpdatePolicy`] this driver was created with
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Release the I2C bus, consuming the driver
    pub fn release(self) -> D {
        self.i2c_dev
    }

    /// Fetch the initial charge status.
    ///
    /// Bus configuration is the responsibility of whoever constructed the I2C device.
    pub async fn init(&mut self) -> Result<(), Error<D::Error>> {
        self.refresh_status().await?;

        #[cfg(feature = "defmt-03")]
        {
            let status = self.status;
            if status.battery_present() {
                defmt::info!("battery present");
            }
            if status.charging() {
                defmt::info!("charging");
            }
            if status.sufficient_charge_current() {
                defmt::info!("charge current sufficient");
            }
            if status.battery_activated() {
                defmt::info!("battery activation mode");
            }
        }

        Ok(())
    }

    /// Read the charge status register into the cached snapshot.
    ///
    /// The status queries below only look at this snapshot, so call this again whenever fresh
    /// values are needed.
    pub async fn refresh_status(&mut self) -> Result<(), Error<D::Error>> {
        let val = self.read_reg(Reg::CHARGE_STATUS).await?;
        self.status = ChargeStatus::from_bytes([val]);
        Ok(())
    }

    /// The snapshot taken by the last [`Axp192::refresh_status`]
    pub fn status(&self) -> ChargeStatus {
        self.status
    }

    /// The IC temperature is above its limit
    pub fn is_overheating(&self) -> bool {
        self.status.overheating()
    }

    /// The battery is being charged
    pub fn is_charging(&self) -> bool {
        self.status.charging()
    }

    /// A battery is connected
    pub fn has_battery(&self) -> bool {
        self.status.battery_present()
    }

    /// The battery is in activation mode
    pub fn is_battery_activated(&self) -> bool {
        self.status.battery_activated()
    }

    /// The reported charge current flag is set
    pub fn has_sufficient_charge_current(&self) -> bool {
        self.status.sufficient_charge_current()
    }

    /// The current [`SwitchMode`]
    pub fn switch_mode(&self) -> SwitchMode {
        self.status.switch_mode()
    }

    /// Switch a [`PowerOutput`] on or off.
    ///
    /// No ordering between outputs is enforced.
    pub async fn set_power_output(&mut self, output: PowerOutput, on: bool) -> Result<(), Error<D::Error>> {
        self.toggle(Reg::POWER_OUTPUT_CONTROL, on, output.bit()).await
    }

    /// Enable or disable the charger
    pub async fn set_charging_enabled(&mut self, on: bool) -> Result<(), Error<D::Error>> {
        self.toggle(Reg::CHARGE_CONTROL_1, on, 0x80).await
    }

    /// Enable or disable sampling of an [`AdcChannel`]
    pub async fn set_adc_channel(&mut self, channel: AdcChannel, on: bool) -> Result<(), Error<D::Error>> {
        let (reg, bit) = channel.location();
        self.toggle(reg, on, bit).await
    }

    /// Set the target voltage for the battery
    pub async fn set_charge_voltage(&mut self, voltage: ChargeVoltage) -> Result<(), Error<D::Error>> {
        self.set_field(voltage).await
    }

    /// Set the current at which charging is considered complete
    pub async fn set_charge_end_current(&mut self, current: ChargeEndCurrent) -> Result<(), Error<D::Error>> {
        self.set_field(current).await
    }

    /// Set the internal charge current
    pub async fn set_charge_current(&mut self, current: ChargeCurrent) -> Result<(), Error<D::Error>> {
        self.set_field(current).await
    }

    /// Set the ADC sample rate
    pub async fn set_adc_sample_rate(&mut self, rate: AdcSampleRate) -> Result<(), Error<D::Error>> {
        self.set_field(rate).await
    }

    /// Set the current sourced by the TS pin
    pub async fn set_ts_current(&mut self, current: TsCurrent) -> Result<(), Error<D::Error>> {
        self.set_field(current).await
    }

    /// Set what the TS pin measures
    pub async fn set_ts_function(&mut self, function: TsFunction) -> Result<(), Error<D::Error>> {
        self.set_field(function).await
    }

    /// Set when the TS pin sources its current
    pub async fn set_ts_output_mode(&mut self, mode: TsOutputMode) -> Result<(), Error<D::Error>> {
        self.set_field(mode).await
    }

    /// Write any [`Field`] to its register
    pub async fn set_field<F: Field>(&mut self, value: F) -> Result<(), Error<D::Error>> {
        self.write_field(F::REG, value).await
    }

    /// Write a [`Field`] given as its raw, unshifted code.
    ///
    /// Returns [`Error::InvalidParameter`] without touching the bus if `code` does not name a
    /// value of `F`.
    pub async fn set_field_code<F: Field>(&mut self, code: u8) -> Result<(), Error<D::Error>> {
        let value = Self::decode_code::<F>(code)?;
        self.write_field(F::REG, value).await
    }

    /// Enable or disable the external path charge current.
    ///
    /// This is a field update, so under [`UpdatePolicy::Legacy`] disabling never clears a bit that
    /// is already set; only [`UpdatePolicy::ClearFirst`] can switch the path off.
    pub async fn set_external_charge_path(&mut self, on: bool) -> Result<(), Error<D::Error>> {
        let val = if on { 0x02 } else { 0x00 };
        self.update(Reg::CHARGE_CONTROL_2, val, 0x02).await
    }

    /// Set the function of a GPIO pin
    pub async fn set_gpio_function(&mut self, pin: GpioPin, function: GpioFunction) -> Result<(), Error<D::Error>> {
        self.write_field(pin.control_reg(), function).await
    }

    /// Set the function of a GPIO pin given as its raw code.
    ///
    /// Returns [`Error::InvalidParameter`] without touching the bus for reserved codes.
    pub async fn set_gpio_function_code(&mut self, pin: GpioPin, code: u8) -> Result<(), Error<D::Error>> {
        let function = Self::decode_code::<GpioFunction>(code)?;
        self.write_field(pin.control_reg(), function).await
    }

    /// Raw 12-bit battery voltage ADC code (1.1mV per LSB)
    pub async fn battery_voltage_raw(&mut self) -> Result<u16, Error<D::Error>> {
        self.read_adc(Reg::BATTERY_VOLTAGE_H, 4).await
    }

    /// Raw battery charge current ADC code (0.5mA per LSB)
    pub async fn battery_charge_current_raw(&mut self) -> Result<u16, Error<D::Error>> {
        self.read_adc(Reg::BATTERY_CHARGE_CURRENT_H, 5).await
    }

    /// Raw battery discharge current ADC code (0.5mA per LSB)
    pub async fn battery_discharge_current_raw(&mut self) -> Result<u16, Error<D::Error>> {
        self.read_adc(Reg::BATTERY_DISCHARGE_CURRENT_H, 5).await
    }

    fn decode_code<F: FieldValue>(code: u8) -> Result<F, Error<D::Error>> {
        fields::decode::<F>(code).ok_or_else(|| {
            #[cfg(feature = "defmt-03")]
            defmt::error!("invalid field code {=u8:#x}", code);
            Error::InvalidParameter
        })
    }

    async fn write_field<F: FieldValue>(&mut self, reg: Reg, value: F) -> Result<(), Error<D::Error>> {
        // Derived enum specifiers always encode; `None` is unreachable for the field types here
        let pattern = fields::encode(value).ok_or(Error::InvalidParameter)?;
        self.update(reg, pattern, F::MASK).await
    }

    async fn read_adc(&mut self, high: Reg, shift: u32) -> Result<u16, Error<D::Error>> {
        let hi = self.read_reg(high).await?;
        let lo = self.read_reg(high.next()).await?;
        Ok((u16::from(hi) << shift) | u16::from(lo))
    }

    async fn toggle(&mut self, reg: Reg, on: bool, bit: u8) -> Result<(), Error<D::Error>> {
        let cur = self.read_reg(reg).await?;
        let val = match (on, self.policy) {
            (true, _) => cur | bit,
            (false, UpdatePolicy::Legacy) => cur ^ bit,
            (false, UpdatePolicy::ClearFirst) => cur & !bit,
        };
        if val == cur {
            #[cfg(feature = "defmt-03")]
            defmt::debug!("{} unchanged", reg);
            return Ok(());
        }
        self.write_reg(reg, val).await
    }

    async fn update(&mut self, reg: Reg, val: u8, mask: u8) -> Result<(), Error<D::Error>> {
        let cur = self.read_reg(reg).await?;
        let base = match self.policy {
            UpdatePolicy::Legacy => cur,
            UpdatePolicy::ClearFirst => cur & !mask,
        };
        self.write_reg(reg, base | (val & mask)).await
    }

    async fn read_reg(&mut self, reg: Reg) -> Result<u8, Error<D::Error>> {
        let mut val = 0u8;
        self.i2c_dev
            .write_read(
                ADDR,
                core::slice::from_ref(&reg.to_u8()),
                core::slice::from_mut(&mut val),
            )
            .await
            .map_err(Error::I2c)?;
        Ok(val)
    }

    async fn write_reg(&mut self, reg: Reg, val: u8) -> Result<(), Error<D::Error>> {
        #[cfg(feature = "defmt-03")]
        defmt::debug!("{} <- {=u8:#x}", reg, val);
        let buf = [reg.to_u8(), val];
        self.i2c_dev.write(ADDR, &buf).await.map_err(Error::I2c)
    }
}
