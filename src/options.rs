use serde::{Deserialize, Serialize};

/// First API level with invoke-polymorphic and invoke-custom.
pub const ANDROID_O_API: i32 = 26;
/// First API level with const-method-handle and const-method-type.
pub const ANDROID_P_API: i32 = 28;

/// Knobs shared by every pass of the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Lowest platform the output has to run on.
    pub min_api_level: i32,
    /// Whether the inlining oracle proposes candidates at all.
    pub inlining: bool,
    /// Callees with more code units than this are never inlined.
    pub inlining_instruction_limit: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            min_api_level: 1,
            inlining: true,
            inlining_instruction_limit: 5,
        }
    }
}

impl CompilerOptions {
    pub fn with_min_api_level(min_api_level: i32) -> Self {
        CompilerOptions { min_api_level, ..Default::default() }
    }

    pub fn can_use_invoke_polymorphic(&self) -> bool {
        self.min_api_level >= ANDROID_O_API
    }

    pub fn can_use_invoke_custom(&self) -> bool {
        self.min_api_level >= ANDROID_O_API
    }

    pub fn can_use_const_method_handle(&self) -> bool {
        self.min_api_level >= ANDROID_P_API
    }

    pub fn can_use_const_method_type(&self) -> bool {
        self.min_api_level >= ANDROID_P_API
    }
}

/// Human readable platform name used in diagnostics.
pub fn api_level_name(api: i32) -> String {
    match api {
        21 => "Android L".to_string(),
        23 => "Android M".to_string(),
        24 => "Android N".to_string(),
        26 => "Android O".to_string(),
        27 => "Android O MR1".to_string(),
        28 => "Android P".to_string(),
        _ => format!("API level {}", api),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_gates() {
        let options = CompilerOptions::with_min_api_level(26);
        assert!(options.can_use_invoke_custom());
        assert!(options.can_use_invoke_polymorphic());
        assert!(!options.can_use_const_method_handle());
        assert!(CompilerOptions::with_min_api_level(28).can_use_const_method_type());
        assert!(!CompilerOptions::default().can_use_invoke_custom());
        assert_eq!(api_level_name(28), "Android P");
        assert_eq!(api_level_name(19), "API level 19");
    }
}
