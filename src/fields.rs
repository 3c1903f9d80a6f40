//! Multi-bit configuration fields and the status snapshot layout

use modular_bitfield::specifiers::B1;
use modular_bitfield::{bitfield, BitfieldSpecifier, Specifier};

use crate::Reg;

/// A value stored in a fixed group of bits within a register.
///
/// The discriminant of each variant is the field code; the pattern written to the register is
/// the code shifted up to the lowest set bit of [`FieldValue::MASK`].
pub trait FieldValue: Specifier<Bytes = u8, InOut = Self> + Copy {
    /// The bits of the register owned by this field.
    const MASK: u8;
}

/// A [`FieldValue`] that always lives in the same register.
pub trait Field: FieldValue {
    /// The register holding this field.
    const REG: Reg;
}

pub(crate) fn encode<F: FieldValue>(value: F) -> Option<u8> {
    let code = F::into_bytes(value).ok()?;
    Some((code << F::MASK.trailing_zeros()) & F::MASK)
}

pub(crate) fn decode<F: FieldValue>(code: u8) -> Option<F> {
    F::from_bytes(code).ok()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 2]
/// Target voltage the battery is charged to
pub enum ChargeVoltage {
    /// 4.10V
    V4_10 = 0,
    /// 4.15V
    V4_15 = 1,
    /// 4.20V
    V4_20 = 2,
    /// 4.36V
    V4_36 = 3,
}

impl FieldValue for ChargeVoltage {
    const MASK: u8 = 0x60;
}

impl Field for ChargeVoltage {
    const REG: Reg = Reg::CHARGE_CONTROL_1;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 1]
/// Charging ends when the charge current falls below this share of the configured charge current
pub enum ChargeEndCurrent {
    /// 10%
    Percent10 = 0,
    /// 15%
    Percent15 = 1,
}

impl FieldValue for ChargeEndCurrent {
    const MASK: u8 = 0x10;
}

impl Field for ChargeEndCurrent {
    const REG: Reg = Reg::CHARGE_CONTROL_1;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 3]
/// Internal charge current
pub enum ChargeCurrent {
    /// 100mA
    Ma100 = 0,
    /// 190mA
    Ma190 = 1,
    /// 280mA
    Ma280 = 2,
    /// 360mA
    Ma360 = 3,
    /// 450mA
    Ma450 = 4,
    /// 550mA
    Ma550 = 5,
    /// 630mA
    Ma630 = 6,
    /// 700mA
    Ma700 = 7,
}

impl FieldValue for ChargeCurrent {
    const MASK: u8 = 0x07;
}

impl Field for ChargeCurrent {
    const REG: Reg = Reg::CHARGE_CONTROL_1;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 2]
/// ADC sample rate
pub enum AdcSampleRate {
    /// 25Hz
    Hz25 = 0,
    /// 50Hz
    Hz50 = 1,
    /// 100Hz
    Hz100 = 2,
    /// 200Hz
    Hz200 = 3,
}

impl FieldValue for AdcSampleRate {
    const MASK: u8 = 0xc0;
}

impl Field for AdcSampleRate {
    const REG: Reg = Reg::ADC_SAMPLE_RATE_TS;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 2]
/// Current sourced by the TS pin
pub enum TsCurrent {
    /// 20uA
    Ua20 = 0,
    /// 40uA
    Ua40 = 1,
    /// 60uA
    Ua60 = 2,
    /// 80uA
    Ua80 = 3,
}

impl FieldValue for TsCurrent {
    const MASK: u8 = 0x30;
}

impl Field for TsCurrent {
    const REG: Reg = Reg::ADC_SAMPLE_RATE_TS;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 1]
/// What the TS pin measures
pub enum TsFunction {
    /// Battery temperature monitoring via an NTC thermistor
    BatteryTemperature = 0,
    /// External independent ADC input
    ExternalInput = 1,
}

impl FieldValue for TsFunction {
    const MASK: u8 = 0x04;
}

impl Field for TsFunction {
    const REG: Reg = Reg::ADC_SAMPLE_RATE_TS;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 2]
/// When the TS pin sources its current
pub enum TsOutputMode {
    /// Current source off
    Off = 0,
    /// On while charging
    Charging = 1,
    /// On during ADC sampling, saves power
    AdcSampling = 2,
    /// Always on
    On = 3,
}

impl FieldValue for TsOutputMode {
    const MASK: u8 = 0x03;
}

impl Field for TsOutputMode {
    const REG: Reg = Reg::ADC_SAMPLE_RATE_TS;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 3]
/// GPIO1/GPIO2 pin function
///
/// The code `0b011` is reserved and `0b111` is not documented, so neither is accepted.
pub enum GpioFunction {
    /// NMOS open drain output
    OpenDrainOutput = 0b000,
    /// Universal input
    Input = 0b001,
    /// PWM output
    PwmOutput = 0b010,
    /// ADC input
    AdcInput = 0b100,
    /// Low output
    LowOutput = 0b101,
    /// Floating
    Floating = 0b110,
}

impl FieldValue for GpioFunction {
    const MASK: u8 = 0x07;
}

/// A GPIO pin whose function can be changed with [`crate::Axp192::set_gpio_function`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GpioPin {
    /// GPIO1
    Gpio1,
    /// GPIO2
    Gpio2,
}

impl GpioPin {
    pub(crate) const fn control_reg(self) -> Reg {
        match self {
            GpioPin::Gpio1 => Reg::GPIO1_CONTROL,
            GpioPin::Gpio2 => Reg::GPIO2_CONTROL,
        }
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 1]
/// Switch mode reported in the charge status register
pub enum SwitchMode {
    #[default]
    /// Mode A
    A,
    /// Mode B
    B,
}

#[bitfield(bits = 8)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Power mode and charge status (register 0x01)
pub struct ChargeStatus {
    #[skip]
    __: B1,
    #[bits = 1]
    pub switch_mode: SwitchMode,
    pub sufficient_charge_current: bool,
    pub battery_activated: bool,
    #[skip]
    __: B1,
    pub battery_present: bool,
    pub charging: bool,
    pub overheating: bool,
}

/// A switched power output in the power output control register
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PowerOutput {
    /// EXTEN output
    Exten,
    /// DC-DC1
    Dcdc1,
    /// DC-DC2
    Dcdc2,
    /// DC-DC3
    Dcdc3,
    /// LDO2
    Ldo2,
    /// LDO3
    Ldo3,
}

impl PowerOutput {
    pub(crate) const fn bit(self) -> u8 {
        match self {
            PowerOutput::Exten => 0x40,
            PowerOutput::Dcdc2 => 0x10,
            PowerOutput::Ldo3 => 0x08,
            PowerOutput::Ldo2 => 0x04,
            PowerOutput::Dcdc3 => 0x02,
            PowerOutput::Dcdc1 => 0x01,
        }
    }
}

/// An ADC channel with its own enable bit
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AdcChannel {
    /// Battery voltage
    BatteryVoltage,
    /// Battery current
    BatteryCurrent,
    /// ACIN voltage
    AcinVoltage,
    /// ACIN current
    AcinCurrent,
    /// VBUS voltage
    VbusVoltage,
    /// VBUS current
    VbusCurrent,
    /// APS voltage
    ApsVoltage,
    /// TS pin
    TsPin,
    /// Internal temperature
    Temperature,
    /// GPIO0
    Gpio0,
    /// GPIO1
    Gpio1,
    /// GPIO2
    Gpio2,
    /// GPIO3
    Gpio3,
}

impl AdcChannel {
    pub(crate) const fn location(self) -> (Reg, u8) {
        match self {
            AdcChannel::BatteryVoltage => (Reg::ADC_ENABLE_1, 0x80),
            AdcChannel::BatteryCurrent => (Reg::ADC_ENABLE_1, 0x40),
            AdcChannel::AcinVoltage => (Reg::ADC_ENABLE_1, 0x20),
            AdcChannel::AcinCurrent => (Reg::ADC_ENABLE_1, 0x10),
            AdcChannel::VbusVoltage => (Reg::ADC_ENABLE_1, 0x08),
            AdcChannel::VbusCurrent => (Reg::ADC_ENABLE_1, 0x04),
            AdcChannel::ApsVoltage => (Reg::ADC_ENABLE_1, 0x02),
            AdcChannel::TsPin => (Reg::ADC_ENABLE_1, 0x01),
            AdcChannel::Temperature => (Reg::ADC_ENABLE_2, 0x80),
            AdcChannel::Gpio0 => (Reg::ADC_ENABLE_2, 0x08),
            AdcChannel::Gpio1 => (Reg::ADC_ENABLE_2, 0x04),
            AdcChannel::Gpio2 => (Reg::ADC_ENABLE_2, 0x02),
            AdcChannel::Gpio3 => (Reg::ADC_ENABLE_2, 0x01),
        }
    }
}
