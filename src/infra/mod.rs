pub mod kube;
pub mod slack;
