//! # kiln-pipeline
//!
//! Composes bundler pipeline descriptions from [`kiln_config`] settings:
//! style loader chains per dialect, module rules, environment-conditional
//! plugin lists, and the dev-server bootstrap that binds a free port.
//!
//! ```
//! use kiln_config::{KilnConfig, Mode};
//! use kiln_pipeline::assemble;
//!
//! let config = KilnConfig::default();
//! let pipeline = assemble::production(&config, Mode::Production).unwrap();
//! assert_eq!(pipeline.module.rules.len(), 12);
//! ```

pub mod assemble;
pub mod devserver;
pub mod error;
pub mod loaders;
pub mod merge;
pub mod notify;
pub mod paths;
pub mod pipeline;
pub mod plugins;
pub mod rules;

pub use assemble::{DevOverrides, development, production, production_with};
pub use devserver::{
    BootstrapState, BootstrappedServer, DevServerBootstrapper, PortBinding, PortProbe,
    TcpPortProbe,
};
pub use error::{PipelineError, PortProbeError, Result};
pub use loaders::{DialectTransform, LoaderChainBuilder, StepDescriptor, TransformationChain};
pub use merge::{PipelineFragment, merge, merge_values};
pub use notify::{CompileError, ErrorNotifier, Notification, Notifier, Severity};
pub use paths::{AssetPaths, PathResolver};
pub use pipeline::{Devtool, PipelineDescription, base_pipeline};
pub use plugins::{PluginComposer, PluginDescriptor, PluginKind, PluginList};
pub use rules::{Rule, RuleUse, StyleRuleSet};
