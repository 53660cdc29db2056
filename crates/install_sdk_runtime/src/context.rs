//! Session-scoped holder of the init options, transport config, and capability descriptor.

use std::cell::RefCell;

use install_sdk_host::{AppBaseConfig, InitOptions, OpenTagConfig, OpenType, TransportConfig};
use serde_json::Value;

#[derive(Debug, Default)]
/// Shared read/write state for one SDK instance.
///
/// Each slot is replaced wholesale on write; there is no history and no merging.
pub struct SessionContext {
    init_data: RefCell<Option<InitOptions>>,
    transport: RefCell<Option<TransportConfig>>,
    base_config: RefCell<Option<AppBaseConfig>>,
}

impl SessionContext {
    /// Stores the host init options.
    pub fn set_init_data(&self, options: InitOptions) {
        *self.init_data.borrow_mut() = Some(options);
    }

    /// Returns the stored init options.
    pub fn init_data(&self) -> Option<InitOptions> {
        self.init_data.borrow().clone()
    }

    /// Stores the transport config resolved during init.
    pub fn set_transport_config(&self, config: TransportConfig) {
        *self.transport.borrow_mut() = Some(config);
    }

    /// Returns the transport config resolved during init.
    pub fn transport_config(&self) -> Option<TransportConfig> {
        self.transport.borrow().clone()
    }

    /// Replaces the capability descriptor.
    pub fn set(&self, config: AppBaseConfig) {
        *self.base_config.borrow_mut() = Some(config);
    }

    /// Returns the capability descriptor.
    pub fn get(&self) -> Option<AppBaseConfig> {
        self.base_config.borrow().clone()
    }

    /// Returns one descriptor field by its wire name, or `None` when unset.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let config = self.base_config.borrow();
        let value = serde_json::to_value(config.as_ref()?).ok()?;
        value.get(key).cloned()
    }

    /// Returns whether the descriptor advertises the open tag.
    pub fn is_support_open_tag(&self) -> bool {
        self.base_config
            .borrow()
            .as_ref()
            .is_some_and(|config| config.supports(OpenType::OpenTag))
    }

    /// App id from the init options, when non-empty.
    pub fn app_id(&self) -> Option<String> {
        self.init_data
            .borrow()
            .as_ref()
            .map(|options| options.id.trim().to_string())
            .filter(|id| !id.is_empty())
    }

    /// Host business payload from the init options.
    pub fn ext_info(&self) -> Option<String> {
        self.init_data
            .borrow()
            .as_ref()
            .and_then(|options| options.ext_info.clone())
            .filter(|ext_info| !ext_info.is_empty())
    }

    /// Debug flag from the init options.
    pub fn is_debug(&self) -> bool {
        self.init_data
            .borrow()
            .as_ref()
            .is_some_and(|options| options.is_debug)
    }

    /// Whether the public-address lookup is enabled.
    pub fn wants_extranet_lookup(&self) -> bool {
        self.init_data
            .borrow()
            .as_ref()
            .map_or(true, InitOptions::wants_extranet_lookup)
    }

    /// Open-tag config from the descriptor.
    pub fn open_tag(&self) -> Option<OpenTagConfig> {
        self.base_config
            .borrow()
            .as_ref()
            .and_then(|config| config.open_tag.clone())
    }

    /// App version from the descriptor, when non-empty.
    pub fn app_version(&self) -> Option<String> {
        self.base_config
            .borrow()
            .as_ref()
            .map(|config| config.app_version.clone())
            .filter(|version| !version.is_empty())
    }
}
