//! Dev-server bootstrap.
//!
//! Bootstrapping resolves a free port (the only await point), writes it into
//! the pipeline's `devServer` section and appends the terminal banner plugin.
//! A failed probe returns the error and nothing else; the pipeline is only
//! handed back once it is complete.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use kiln_config::EnvironmentToggles;
use serde_json::json;
use tokio::net::{TcpListener, lookup_host};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PortProbeError, Result};
use crate::notify::{ErrorNotifier, Notifier};
use crate::pipeline::PipelineDescription;
use crate::plugins::{PluginDescriptor, PluginKind};

/// Ports tried after the requested one before giving up.
pub const DEFAULT_PROBE_WINDOW: u16 = 10;

/// Finds a bindable port at or above a base port.
#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn probe(&self, host: &str, base_port: u16) -> std::result::Result<u16, PortProbeError>;
}

/// Probes by binding TCP listeners, walking upwards from the base port.
#[derive(Debug, Clone, Copy)]
pub struct TcpPortProbe {
    window: u16,
}

impl TcpPortProbe {
    pub fn new(window: u16) -> Self {
        Self { window }
    }
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_WINDOW)
    }
}

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn probe(&self, host: &str, base_port: u16) -> std::result::Result<u16, PortProbeError> {
        let mut addrs: Vec<SocketAddr> = lookup_host((host, base_port))
            .await
            .map_err(|source| PortProbeError::InvalidHost {
                host: host.to_string(),
                source,
            })?
            .collect();
        // `localhost` may resolve to both families; IPv4 is what gets served
        if addrs.iter().any(SocketAddr::is_ipv4) {
            addrs.retain(SocketAddr::is_ipv4);
        }

        let last = base_port.saturating_add(self.window);
        for port in base_port..=last {
            if bindable(&addrs, port).await {
                return Ok(port);
            }
            debug!(port, "port busy");
        }

        Err(PortProbeError::Exhausted {
            host: host.to_string(),
            from: base_port,
            to: last,
        })
    }
}

async fn bindable(addrs: &[SocketAddr], port: u16) -> bool {
    if addrs.is_empty() {
        return false;
    }
    for addr in addrs {
        let mut addr = *addr;
        addr.set_port(port);
        if TcpListener::bind(addr).await.is_err() {
            return false;
        }
    }
    true
}

/// Requested and actually bound port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub requested_port: u16,
    pub bound_port: u16,
}

impl PortBinding {
    pub fn reassigned(&self) -> bool {
        self.requested_port != self.bound_port
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    ProbingPort { requested_port: u16 },
    PortBound(PortBinding),
    ProbeFailed,
}

/// A pipeline ready to serve.
#[derive(Clone)]
pub struct BootstrappedServer {
    pub pipeline: PipelineDescription,
    pub binding: PortBinding,
    pub url: String,
    /// Present when error notifications are enabled.
    pub notifier: Option<ErrorNotifier>,
}

impl std::fmt::Debug for BootstrappedServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrappedServer")
            .field("binding", &self.binding)
            .field("url", &self.url)
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

/// Banner printed once the server is up.
pub fn running_banner(host: &str, port: u16) -> String {
    format!("Your application is running here: http://{host}:{port}")
}

/// Drives `Idle → ProbingPort → PortBound | ProbeFailed`.
pub struct DevServerBootstrapper<P> {
    probe: P,
    port_override: Option<u16>,
    notifications: Option<NotificationTarget>,
    state: BootstrapState,
}

struct NotificationTarget {
    title: String,
    icon: PathBuf,
    sink: Arc<dyn Notifier>,
}

impl<P: PortProbe> DevServerBootstrapper<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            port_override: None,
            notifications: None,
            state: BootstrapState::Idle,
        }
    }

    /// Probe from this port instead of the pipeline's configured one.
    pub fn port_override(mut self, port: Option<u16>) -> Self {
        self.port_override = port;
        self
    }

    /// Where compile-error notifications go when the toggles enable them.
    pub fn notifications(
        mut self,
        title: impl Into<String>,
        icon: impl Into<PathBuf>,
        sink: Arc<dyn Notifier>,
    ) -> Self {
        self.notifications = Some(NotificationTarget {
            title: title.into(),
            icon: icon.into(),
            sink,
        });
        self
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub async fn bootstrap(
        &mut self,
        mut pipeline: PipelineDescription,
        toggles: &EnvironmentToggles,
    ) -> Result<BootstrappedServer> {
        let (host, configured_port) = pipeline
            .dev_server_address()
            .map(|(host, port)| (host.to_string(), port))
            .ok_or(PipelineError::MissingDevServer)?;
        let requested_port = self.port_override.unwrap_or(configured_port);

        self.state = BootstrapState::ProbingPort { requested_port };
        debug!(%host, requested_port, "probing for a free port");

        let bound_port = match self.probe.probe(&host, requested_port).await {
            Ok(port) => port,
            Err(err) => {
                self.state = BootstrapState::ProbeFailed;
                return Err(err.into());
            }
        };

        let binding = PortBinding {
            requested_port,
            bound_port,
        };
        if binding.reassigned() {
            warn!(requested_port, bound_port, "port is busy, using the next free one");
        }

        let notifier = match &self.notifications {
            Some(target) if toggles.notify_on_errors() => Some(ErrorNotifier::new(
                target.title.clone(),
                target.icon.clone(),
                Arc::clone(&target.sink),
            )),
            _ => None,
        };

        let url = format!("http://{host}:{bound_port}");
        if let Some(server) = pipeline.dev_server.as_mut() {
            server.port = bound_port;
        }
        pipeline.plugins.push(PluginDescriptor::with_config(
            PluginKind::FriendlyErrors,
            json!({
                "compilationSuccessInfo": { "messages": [running_banner(&host, bound_port)] },
                "notifyOnErrors": notifier.is_some()
            }),
        ));

        self.state = BootstrapState::PortBound(binding);
        info!(%url, "dev server port bound");

        Ok(BootstrappedServer {
            pipeline,
            binding,
            url,
            notifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{DevOverrides, development};
    use crate::notify::Notification;
    use kiln_config::{KilnConfig, Mode};
    use std::sync::Mutex;

    /// Pretends a fixed set of ports is taken.
    struct MockProbe {
        busy: Vec<u16>,
    }

    #[async_trait]
    impl PortProbe for MockProbe {
        async fn probe(&self, host: &str, base_port: u16) -> std::result::Result<u16, PortProbeError> {
            (base_port..=base_port + 3)
                .find(|port| !self.busy.contains(port))
                .ok_or(PortProbeError::Exhausted {
                    host: host.to_string(),
                    from: base_port,
                    to: base_port + 3,
                })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: &Notification) {
            self.seen.lock().unwrap().push(notification.clone());
        }
    }

    fn dev_pipeline() -> (PipelineDescription, EnvironmentToggles) {
        let config = KilnConfig::default();
        let pipeline = development(&config, &DevOverrides::default()).unwrap();
        (pipeline, config.toggles(Mode::Development).unwrap())
    }

    #[tokio::test]
    async fn free_port_is_used_as_is() {
        let (pipeline, toggles) = dev_pipeline();
        let mut bootstrapper = DevServerBootstrapper::new(MockProbe { busy: vec![] });
        assert_eq!(bootstrapper.state(), BootstrapState::Idle);

        let server = bootstrapper.bootstrap(pipeline, &toggles).await.unwrap();
        assert_eq!(server.binding.bound_port, 8080);
        assert!(!server.binding.reassigned());
        assert_eq!(server.url, "http://localhost:8080");
        assert_eq!(
            bootstrapper.state(),
            BootstrapState::PortBound(server.binding)
        );
    }

    #[tokio::test]
    async fn busy_port_is_reassigned_and_written_back() {
        let (pipeline, toggles) = dev_pipeline();
        let mut bootstrapper = DevServerBootstrapper::new(MockProbe {
            busy: vec![8080, 8081],
        });

        let server = bootstrapper.bootstrap(pipeline, &toggles).await.unwrap();
        assert_eq!(server.binding.requested_port, 8080);
        assert_eq!(server.binding.bound_port, 8082);
        assert_eq!(server.pipeline.dev_server.as_ref().unwrap().port, 8082);

        let banner = server.pipeline.plugins.last().unwrap();
        assert!(banner.is(PluginKind::FriendlyErrors));
        assert_eq!(
            banner.config["compilationSuccessInfo"]["messages"][0],
            "Your application is running here: http://localhost:8082"
        );
    }

    #[tokio::test]
    async fn override_replaces_configured_port() {
        let (pipeline, toggles) = dev_pipeline();
        let mut bootstrapper =
            DevServerBootstrapper::new(MockProbe { busy: vec![] }).port_override(Some(9000));
        let server = bootstrapper.bootstrap(pipeline, &toggles).await.unwrap();
        assert_eq!(server.binding.requested_port, 9000);
        assert_eq!(server.binding.bound_port, 9000);
    }

    #[tokio::test]
    async fn failed_probe_returns_no_pipeline() {
        let (pipeline, toggles) = dev_pipeline();
        let mut bootstrapper = DevServerBootstrapper::new(MockProbe {
            busy: (8080..=8083).collect(),
        });

        let err = bootstrapper.bootstrap(pipeline, &toggles).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PortProbe(PortProbeError::Exhausted { from: 8080, to: 8083, .. })
        ));
        assert_eq!(bootstrapper.state(), BootstrapState::ProbeFailed);
    }

    #[tokio::test]
    async fn notifier_attached_only_when_enabled() {
        let (pipeline, toggles) = dev_pipeline();
        let sink = Arc::new(RecordingNotifier::default());
        let mut bootstrapper = DevServerBootstrapper::new(MockProbe { busy: vec![] })
            .notifications("shop", "build/logo.png", sink.clone());
        let server = bootstrapper.bootstrap(pipeline.clone(), &toggles).await.unwrap();
        assert!(server.notifier.is_some());

        let quiet = EnvironmentToggles::builder(Mode::Development).build().unwrap();
        let server = bootstrapper.bootstrap(pipeline, &quiet).await.unwrap();
        assert!(server.notifier.is_none());
        assert_eq!(
            server.pipeline.plugins.last().unwrap().config["notifyOnErrors"],
            false
        );
    }

    #[tokio::test]
    async fn pipeline_without_dev_server_is_rejected() {
        let config = KilnConfig::default();
        let pipeline = crate::assemble::production(&config, Mode::Production).unwrap();
        let toggles = config.toggles(Mode::Production).unwrap();
        let mut bootstrapper = DevServerBootstrapper::new(MockProbe { busy: vec![] });
        let err = bootstrapper.bootstrap(pipeline, &toggles).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingDevServer));
        assert_eq!(bootstrapper.state(), BootstrapState::Idle);
    }

    #[tokio::test]
    async fn tcp_probe_skips_a_bound_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken = listener.local_addr().unwrap().port();

        let port = TcpPortProbe::default().probe("127.0.0.1", taken).await.unwrap();
        assert_ne!(port, taken);
        assert!(port > taken && port <= taken.saturating_add(DEFAULT_PROBE_WINDOW));
    }
}
