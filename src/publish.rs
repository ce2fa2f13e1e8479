//! Publish workflow and image-push script generation

use crate::config::CiConfig;
use crate::workflow::{checkout_step, Job, Step, Trigger, Workflow, UBUNTU_RUNNER};
use std::collections::BTreeMap;

/// Shell script pushing the configured docker images to ghcr.io. The
/// branch decides the image tag; pushes from the bors `staging` branch are
/// skipped because `trying` already published the same commit as `dev`.
pub fn generate_publish_image_script(config: &CiConfig) -> String {
    let mut lines = vec!["set -euxo pipefail".to_string()];
    let header = r#"
# GENERATED FILE DO NOT EDIT
if [ "$GITHUB_REF" = "refs/heads/master" ]
then
  TAG="latest"
elif [ "$GITHUB_REF" = "refs/heads/trying" ]
then
  TAG="dev"
elif [ "$GITHUB_REF" = "refs/heads/staging" ]
then
  exit 0
else
  echo "unknown GITHUB_REF: $GITHUB_REF"
  exit 1
fi
echo $GITHUB_TOKEN | docker login ghcr.io -u $GITHUB_ACTOR --password-stdin"#;
    lines.push(header.to_string());

    for image in &config.docker_images {
        lines.push(format!("docker tag {image} ghcr.io/jjs-dev/{image}:$TAG"));
        lines.push(format!("docker push ghcr.io/jjs-dev/{image}:$TAG"));
    }

    lines.join("\n")
}

/// Workflow with one push-guarded job building and pushing distributable
/// artifacts.
pub fn make_publish_workflow(config: &CiConfig) -> Workflow {
    let mut env = BTreeMap::new();
    env.insert(
        "GITHUB_TOKEN".to_string(),
        "${{ secrets.GITHUB_TOKEN }}".to_string(),
    );

    let publish_job = Job {
        runs_on: UBUNTU_RUNNER.to_string(),
        r#if: Some("github.event_name == 'push'".to_string()),
        timeout_minutes: config.job_timeout_minutes,
        env: Some(env),
        steps: vec![
            checkout_step(),
            Step::run("Build artifacts", "bash ci/publish-build.sh"),
            Step::run("Publish docker images", "bash ci/publish-images.sh"),
        ],
        ..Default::default()
    };

    let mut jobs = BTreeMap::new();
    jobs.insert("publish".to_string(), publish_job);

    Workflow {
        name: "publish".to_string(),
        on: Trigger::on_pull_request_and_bors_branches(),
        jobs,
    }
}
