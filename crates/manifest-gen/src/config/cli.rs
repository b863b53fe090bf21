use clap::Parser;
use utils::version;

/// Default container image tag for the device plugin.
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Default MIG strategy passed through to the plugin container.
pub const DEFAULT_MIG_STRATEGY: &str = "none";

/// Generate the nvidia-device-plugin DaemonSet manifest on stdout
#[derive(Parser, Debug, Clone)]
#[command(version = &**version::VERSION)]
pub struct Cli {
    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    #[arg(
        long,
        help = "Use the legacy DaemonSet API version 'extensions/v1beta1' instead of 'apps/v1'",
        default_value_t = false,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub legacy_daemonset_api: bool,

    #[arg(
        long,
        default_value = DEFAULT_IMAGE_TAG,
        help = "Docker image tag of the device plugin, see https://hub.docker.com/r/nvidia/k8s-device-plugin"
    )]
    pub image_tag: String,

    #[arg(
        long,
        default_value = DEFAULT_MIG_STRATEGY,
        help = "Strategy for exposing MIG devices on GPUs that support it [none | single | mixed]"
    )]
    pub mig_strategy: String,

    #[arg(
        long,
        help = "Run with escalated privileges to be compatible with the CPUManager",
        default_value_t = false,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub compat_with_cpu_manager: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            legacy_daemonset_api: false,
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            mig_strategy: DEFAULT_MIG_STRATEGY.to_string(),
            compat_with_cpu_manager: false,
        }
    }
}
