/// 定义以字符串存储的枚举
///
/// 自动生成：
/// - 带 serde / ts-rs 派生的 enum 定义
/// - ALL 常量与 as_str() 方法
/// - Display 与 FromStr 实现
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($export:tt) {
            $($variant:ident => $text:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            ts_rs::TS,
        )]
        #[ts(export, export_to = $export)]
        $vis enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub(crate) use define_string_enum;

#[cfg(test)]
mod tests {
    define_string_enum! {
        pub enum Shade("../frontend/src/types/generated/test.ts") {
            Light => "light",
            Dark => "dark",
        }
    }

    #[test]
    fn test_string_enum_conversions() {
        assert_eq!(Shade::Light.as_str(), "light");
        assert_eq!("dark".parse::<Shade>().unwrap(), Shade::Dark);
        assert!("grey".parse::<Shade>().is_err());
        assert_eq!(Shade::ALL.len(), 2);
        assert_eq!(serde_json::to_string(&Shade::Dark).unwrap(), "\"dark\"");
    }
}
