// ─── Luximo Core ───
// Keeps a local tree of game-server artifacts in sync with the catalog.
//
// Architecture:
//   core/
//     version/    — Version parsing + latest-of-a-list
//     identity    — `name-version` encoding of on-disk names
//     catalog/    — Catalog snapshot model + HTTP client
//     family/     — Plugin, Paper, Velocity, Map layouts and wire models
//     inventory/  — Local directory scanner
//     reconcile/  — Diff (plan) + apply (delete, staged fetch)
//     updater     — Per-family entry points with locking
//     state/      — Settings + bootstrap

pub mod catalog;
pub mod error;
pub mod family;
pub mod http;
pub mod identity;
pub mod inventory;
pub mod reconcile;
pub mod state;
pub mod updater;
pub mod version;
