//! Adapter: a vendor SDK reports Fahrenheit, the rest of the system wants
//! Celsius. The adapter wraps the vendor device and converts on read.

use tracing::debug;

/// The thermometer interface the system is written against (Celsius).
pub trait Thermometer: Send + Sync {
    fn centigrade(&self) -> f64;
}

/// Builds thermometers from a configuration string.
pub trait ThermometerFactory: Send + Sync {
    fn create(&self, config: &str) -> Box<dyn Thermometer>;
}

/// The vendor SDK interface (Fahrenheit).
pub trait SpecialThermometer: Send + Sync {
    fn fahrenheit(&self) -> f64;
}

/// Vendor thermometer mock; always reports 79.7°F.
#[derive(Clone, Debug)]
pub struct MockSpecialThermometer {
    address: String,
}

impl MockSpecialThermometer {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl SpecialThermometer for MockSpecialThermometer {
    fn fahrenheit(&self) -> f64 {
        79.7
    }
}

/// Presents a [`SpecialThermometer`] as a [`Thermometer`].
#[derive(Clone, Debug)]
pub struct SpecialThermometerAdapter<T> {
    origin: T,
}

impl<T: SpecialThermometer> SpecialThermometerAdapter<T> {
    pub fn new(origin: T) -> Self {
        Self { origin }
    }

    pub fn into_inner(self) -> T {
        self.origin
    }
}

impl<T: SpecialThermometer> Thermometer for SpecialThermometerAdapter<T> {
    fn centigrade(&self) -> f64 {
        (self.origin.fahrenheit() - 32.0) * 5.0 / 9.0
    }
}

/// Factory that hides the vendor device behind the adapter.
#[derive(Debug, Default)]
pub struct SpecialThermometerFactory;

impl SpecialThermometerFactory {
    pub const DEFAULT_ADDRESS: &'static str = "http://localhost:8080";

    /// Extract `address` from a `key=value;key=value` string.
    pub fn parse_address(config: &str) -> String {
        config
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == "address")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_ADDRESS.to_string())
    }
}

impl ThermometerFactory for SpecialThermometerFactory {
    fn create(&self, config: &str) -> Box<dyn Thermometer> {
        let address = Self::parse_address(config);
        debug!(address = %address, "special thermometer created");
        Box::new(SpecialThermometerAdapter::new(MockSpecialThermometer::new(address)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_converts_to_celsius() {
        let t = SpecialThermometerAdapter::new(MockSpecialThermometer::new("x"));
        assert!((t.centigrade() - 26.5).abs() < 1e-9);
    }

    #[test]
    fn factory_returns_system_interface() {
        let t = SpecialThermometerFactory.create("address=http://10.0.0.2:9000");
        assert!((t.centigrade() - 26.5).abs() < 1e-9);
    }

    #[test]
    fn parse_address_variants() {
        assert_eq!(
            SpecialThermometerFactory::parse_address("model=x; address = http://h:1 ;"),
            "http://h:1"
        );
        assert_eq!(
            SpecialThermometerFactory::parse_address("model=x"),
            SpecialThermometerFactory::DEFAULT_ADDRESS
        );
        assert_eq!(
            SpecialThermometerFactory::parse_address("address="),
            SpecialThermometerFactory::DEFAULT_ADDRESS
        );
    }

    #[test]
    fn adapter_keeps_origin() {
        let adapter = SpecialThermometerAdapter::new(MockSpecialThermometer::new("http://a"));
        assert_eq!(adapter.into_inner().address(), "http://a");
    }
}
