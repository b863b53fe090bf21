//! The nvidia-device-plugin DaemonSet template and its renderer.

use std::io::Write;

use error_stack::Report;
use error_stack::ResultExt;
use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::UndefinedBehavior;

use crate::customizations::RenderConfig;
use crate::error::ManifestError;

pub const TEMPLATE_NAME: &str = "nvidia-device-plugin";

pub const PLUGIN_TEMPLATE: &str = r#"
# Copyright (c) 2020, NVIDIA CORPORATION.  All rights reserved.
#
# Licensed under the Apache License, Version 2.0 (the "License");
# you may not use this file except in compliance with the License.
# You may obtain a copy of the License at
#
#     http://www.apache.org/licenses/LICENSE-2.0
#
# Unless required by applicable law or agreed to in writing, software
# distributed under the License is distributed on an "AS IS" BASIS,
# WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
# See the License for the specific language governing permissions and
# limitations under the License.

apiVersion: {{ api_version }}
kind: DaemonSet
metadata:
  name: nvidia-device-plugin-daemonset
  namespace: kube-system
spec:
  {{ selector }}
  updateStrategy:
    type: RollingUpdate
  template:
    metadata:
      # This annotation is deprecated. Kept here for backward compatibility
      # See https://kubernetes.io/docs/tasks/administer-cluster/guaranteed-scheduling-critical-addon-pods/
      annotations:
        scheduler.alpha.kubernetes.io/critical-pod: ""
      labels:
        name: nvidia-device-plugin-ds
    spec:
      tolerations:
      # This toleration is deprecated. Kept here for backward compatibility
      # See https://kubernetes.io/docs/tasks/administer-cluster/guaranteed-scheduling-critical-addon-pods/
      - key: CriticalAddonsOnly
        operator: Exists
      - key: nvidia.com/gpu
        operator: Exists
        effect: NoSchedule
      # Mark this pod as a critical add-on; when enabled, the critical add-on
      # scheduler reserves resources for critical add-on pods so that they can
      # be rescheduled after a failure.
      # See https://kubernetes.io/docs/tasks/administer-cluster/guaranteed-scheduling-critical-addon-pods/
      priorityClassName: "system-node-critical"
      containers:
      - image: nvidia/k8s-device-plugin:{{ image_tag }}
        name: nvidia-device-plugin-ctr
        args: [{% for arg in args %} "{{ arg }}", {% endfor %}]
        {{ security_context }}
        volumeMounts:
          - name: device-plugin
            mountPath: /var/lib/kubelet/device-plugins
      volumes:
        - name: device-plugin
          hostPath:
            path: /var/lib/kubelet/device-plugins
"#;

/// Creates the template environment holding [`PLUGIN_TEMPLATE`].
///
/// Values are inserted verbatim: no escaping, and the final newline of the
/// template is preserved.
fn environment() -> Result<Environment<'static>, Report<ManifestError>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template(TEMPLATE_NAME, PLUGIN_TEMPLATE)
        .change_context(ManifestError::Template {
            name: TEMPLATE_NAME,
        })
        .attach_printable("template definition is malformed")?;
    Ok(env)
}

/// Renders the DaemonSet manifest for `config`.
///
/// # Errors
///
/// - [`ManifestError::Template`] if the compiled-in template is malformed
pub fn render(config: &RenderConfig) -> Result<String, Report<ManifestError>> {
    let env = environment()?;
    let template = env
        .get_template(TEMPLATE_NAME)
        .change_context(ManifestError::Template {
            name: TEMPLATE_NAME,
        })?;

    template
        .render(config)
        .change_context(ManifestError::Template {
            name: TEMPLATE_NAME,
        })
        .attach_printable_lazy(|| format!("render configuration: {config:?}"))
}

/// Renders the manifest and writes it to `writer` as a single document.
///
/// # Errors
///
/// - [`ManifestError::Template`] if rendering fails
/// - [`ManifestError::Write`] if the writer rejects the output, e.g. a closed pipe
pub fn write_manifest<W: Write>(
    config: &RenderConfig,
    mut writer: W,
) -> Result<(), Report<ManifestError>> {
    let manifest = render(config)?;

    writer
        .write_all(manifest.as_bytes())
        .and_then(|()| writer.flush())
        .change_context(ManifestError::Write)
        .attach_printable_lazy(|| format!("manifest size: {} bytes", manifest.len()))?;

    tracing::debug!(
        api_version = config.api_version(),
        image_tag = config.image_tag(),
        bytes = manifest.len(),
        "DaemonSet manifest written"
    );
    Ok(())
}
