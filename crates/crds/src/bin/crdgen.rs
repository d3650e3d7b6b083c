//! Prints the CRD manifests for `kubectl apply -f -`.

use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&crds::Server::crd())?);
    Ok(())
}
