//! Test utilities for rewire integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Write a file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Read a file below `root` as UTF-8
pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// A small Flutter-style tree mid-migration away from ApiService
pub fn create_flutter_project(root: &Path) {
    write_file(
        root,
        "lib/screens/login_screen.dart",
        "import '../services/api_service.dart';\n\nfinal r = ApiService.login(user, pass);\n",
    );
    write_file(
        root,
        "lib/screens/staff/tabs/properties_tab.dart",
        "import '../../../services/api_service.dart';\n\nfinal p = ApiService.getProperties();\n",
    );
    write_file(
        root,
        "lib/main.dart",
        "void main() => runApp(const App());\n",
    );
    write_file(
        root,
        "lib/build/generated_screen.dart",
        "import '../services/api_service.dart';\n",
    );
    write_file(
        root,
        "lib/.dart_tool/cache.dart",
        "ApiService.login(a, b);\n",
    );
    write_file(root, "lib/assets/notes.txt", "ApiService.login(a, b);\n");
}

/// Configuration matching `create_flutter_project`
pub const FLUTTER_CONFIG: &str = r#"
[rewire]
version = "1"
root = "lib"
extensions = ["dart"]
exclude_dirs = ["build", ".dart_tool", "generated"]

[[rules]]
pattern = 'ApiService\.login\('
replacement = "AuthRoutes.login("

[[rules]]
pattern = 'ApiService\.getProperties\('
replacement = "PropertyRoutes.getProperties("

[[rules]]
pattern = "import '../services/api_service.dart';"
replacement = "import '../providers/api_routes/auth_routes.dart';"
literal = true

[[scopes]]
location = "screens/staff/tabs/**"

[[scopes.rules]]
pattern = "import '../../../services/api_service.dart';"
replacement = "import '../../../providers/api_routes/property_routes.dart';"
literal = true
"#;
