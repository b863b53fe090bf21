use k8s_openapi::api::apps::v1::DaemonSet;
use manifest_gen::config::GenerateArgs;
use manifest_gen::render;
use manifest_gen::RenderConfig;
use similar_asserts::assert_eq;

fn render_flags(flags: &GenerateArgs) -> String {
    render(&RenderConfig::new(flags)).expect("template should render")
}

fn parse_daemonset(manifest: &str) -> DaemonSet {
    serde_yaml::from_str(manifest).expect("manifest should be a valid apps/v1 DaemonSet")
}

#[test]
fn default_manifest_is_a_valid_daemonset() {
    let ds = parse_daemonset(&render_flags(&GenerateArgs::default()));

    assert_eq!(
        ds.metadata.name.as_deref(),
        Some("nvidia-device-plugin-daemonset")
    );
    assert_eq!(ds.metadata.namespace.as_deref(), Some("kube-system"));

    let spec = ds.spec.expect("spec");
    let match_labels = spec.selector.match_labels.expect("matchLabels");
    assert_eq!(
        match_labels.get("name").map(String::as_str),
        Some("nvidia-device-plugin-ds")
    );
    assert_eq!(
        spec.update_strategy
            .and_then(|s| s.type_)
            .as_deref(),
        Some("RollingUpdate")
    );

    let template_meta = spec.template.metadata.expect("pod metadata");
    assert_eq!(
        template_meta
            .annotations
            .expect("annotations")
            .get("scheduler.alpha.kubernetes.io/critical-pod")
            .map(String::as_str),
        Some("")
    );
    assert_eq!(
        template_meta
            .labels
            .expect("labels")
            .get("name")
            .map(String::as_str),
        Some("nvidia-device-plugin-ds")
    );

    let pod = spec.template.spec.expect("pod spec");
    assert_eq!(
        pod.priority_class_name.as_deref(),
        Some("system-node-critical")
    );

    let tolerations = pod.tolerations.expect("tolerations");
    let keys: Vec<_> = tolerations
        .iter()
        .map(|t| t.key.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(keys, ["CriticalAddonsOnly", "nvidia.com/gpu"]);
    assert_eq!(tolerations[1].effect.as_deref(), Some("NoSchedule"));

    assert_eq!(pod.containers.len(), 1);
    let container = &pod.containers[0];
    assert_eq!(container.name, "nvidia-device-plugin-ctr");
    assert_eq!(
        container.image.as_deref(),
        Some("nvidia/k8s-device-plugin:latest")
    );
    assert_eq!(
        container.args.as_deref(),
        Some(&["--mig-strategy=none".to_string()][..])
    );

    let security = container.security_context.as_ref().expect("securityContext");
    assert_eq!(security.allow_privilege_escalation, Some(false));
    assert_eq!(security.privileged, None);
    assert_eq!(
        security
            .capabilities
            .as_ref()
            .and_then(|c| c.drop.clone()),
        Some(vec!["ALL".to_string()])
    );

    let mounts = container.volume_mounts.as_ref().expect("volumeMounts");
    assert_eq!(mounts[0].name, "device-plugin");
    assert_eq!(mounts[0].mount_path, "/var/lib/kubelet/device-plugins");

    let volumes = pod.volumes.expect("volumes");
    assert_eq!(volumes[0].name, "device-plugin");
    assert_eq!(
        volumes[0].host_path.as_ref().map(|h| h.path.as_str()),
        Some("/var/lib/kubelet/device-plugins")
    );
}

#[test]
fn cpu_manager_manifest_is_privileged() {
    let ds = parse_daemonset(&render_flags(&GenerateArgs {
        image_tag: "v0.7.0".to_string(),
        mig_strategy: "single".to_string(),
        compat_with_cpu_manager: true,
        ..GenerateArgs::default()
    }));

    let pod = ds.spec.expect("spec").template.spec.expect("pod spec");
    let container = &pod.containers[0];
    assert_eq!(
        container.image.as_deref(),
        Some("nvidia/k8s-device-plugin:v0.7.0")
    );
    assert_eq!(
        container.args.clone(),
        Some(vec![
            "--mig-strategy=single".to_string(),
            "--pass-device-specs".to_string()
        ])
    );

    let security = container.security_context.as_ref().expect("securityContext");
    assert_eq!(security.privileged, Some(true));
    assert_eq!(security.allow_privilege_escalation, None);
    assert!(security.capabilities.is_none());
}

#[test]
fn legacy_manifest_has_no_selector() {
    let manifest = render_flags(&GenerateArgs {
        legacy_daemonset_api: true,
        ..GenerateArgs::default()
    });
    let doc: serde_yaml::Value = serde_yaml::from_str(&manifest).expect("valid yaml");

    assert_eq!(
        doc["apiVersion"].as_str(),
        Some("extensions/v1beta1")
    );
    assert_eq!(doc["kind"].as_str(), Some("DaemonSet"));

    let spec = doc["spec"].as_mapping().expect("spec mapping");
    assert!(spec.get("selector").is_none());
    assert!(spec.get("updateStrategy").is_some());
    assert!(spec.get("template").is_some());
}
