//! Entry-point planning: which modules are compilation roots per stage.

use std::path::Path;

use indexmap::IndexMap;

use crate::settings::ProgramSettings;
use crate::stage::Stage;

/// Named entry bundles in declaration order; each bundle lists its root
/// modules in load order.
pub type EntryPoints = IndexMap<String, Vec<String>>;

/// Client bootstrap that connects the page to the development server.
const DEV_SERVER_CLIENT: &str = "plinth-dev-server/client";

/// Client runtime that applies hot-swapped modules in place.
const HOT_RELOAD_CLIENT: &str = "plinth-hot-reload/client";

/// Directory of on-disk intermediate-representation modules generated ahead
/// of composition by the page-discovery step.
const INTERMEDIATE_DIR: &str = ".intermediate-representation";

pub(crate) fn plan_entries(
    stage: Stage,
    directory: &Path,
    framework_dir: &Path,
    program: &ProgramSettings,
    port: u16,
) -> EntryPoints {
    let mut entries = EntryPoints::new();

    match stage {
        Stage::Develop | Stage::DevelopHtml => {
            // Tooling clients must initialize before any app code runs.
            entries.insert(
                "commons".to_string(),
                vec![
                    format!("{DEV_SERVER_CLIENT}?http://{}:{}", program.host, port),
                    HOT_RELOAD_CLIENT.to_string(),
                    intermediate_module(directory, "app"),
                ],
            );
        }
        Stage::BuildCss => {
            entries.insert(
                "main".to_string(),
                vec![intermediate_module(directory, "app")],
            );
        }
        Stage::BuildHtml => {
            // The render driver is a framework module, not a site module.
            entries.insert(
                "main".to_string(),
                vec![module_path(framework_dir, "static-entry")],
            );
        }
        Stage::BuildJavascript => {
            entries.insert(
                "app".to_string(),
                vec![intermediate_module(directory, "production-app")],
            );
        }
    }

    entries
}

fn intermediate_module(directory: &Path, name: &str) -> String {
    module_path(&directory.join(INTERMEDIATE_DIR), name)
}

fn module_path(base: &Path, name: &str) -> String {
    base.join(name).to_string_lossy().into_owned()
}
