use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    #[serde(alias = "email", alias = "identifier")]
    pub username: String,
    pub password: String,
    /// 延长刷新令牌有效期
    #[serde(default)]
    pub remember_me: bool,
}

// 修改密码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// 注册密钥查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SecretKeyLookupQuery {
    pub secret_key: String,
}

// 家长 / 教师凭注册密钥开户
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct OnboardingRegisterRequest {
    pub secret_key: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
