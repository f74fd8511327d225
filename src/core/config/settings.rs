use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment,
    parse_same_site, parse_u16, parse_u32, parse_u64,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, RedisSettings,
    RuntimeSettings, SameSite, SecuritySettings, ServerHost, ServerPort, ServerSettings,
    SessionCookieSettings, Settings, TelemetrySettings, TokenSettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("EXAMHALL_HOST", "0.0.0.0");
        let port = env_or_default("EXAMHALL_PORT", "8000");

        let environment = parse_environment(
            env_optional("EXAMHALL_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("EXAMHALL_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Examhall API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_prefix = env_or_default("API_PREFIX", "/api");

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None => load_or_create_secret_key(),
        };
        let default_expire = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "1440"),
        )?;
        let admin_token = token_settings(
            "ADMIN_TOKEN_SECRET",
            "ADMIN_TOKEN_EXPIRE_MINUTES",
            &secret_key,
            default_expire,
        )?;
        let teacher_token = token_settings(
            "TEACHER_TOKEN_SECRET",
            "TEACHER_TOKEN_EXPIRE_MINUTES",
            &secret_key,
            default_expire,
        )?;
        let student_token = token_settings(
            "STUDENT_TOKEN_SECRET",
            "STUDENT_TOKEN_EXPIRE_MINUTES",
            &secret_key,
            default_expire,
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cookie_name = env_or_default("SESSION_COOKIE_NAME", "authToken");
        let cookie_path = env_or_default("SESSION_COOKIE_PATH", "/");
        let cookie_secure = env_optional("SESSION_COOKIE_SECURE")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);
        let cookie_same_site = parse_same_site(env_or_default("SESSION_COOKIE_SAME_SITE", "None"))?;

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "examhall");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "examhall_db");
        let database_url = env_optional("DATABASE_URL");
        let max_connections =
            parse_u32("DB_MAX_CONNECTIONS", env_or_default("DB_MAX_CONNECTIONS", "20"))?;

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let first_admin_email = env_or_default("FIRST_ADMIN_EMAIL", "");
        let first_admin_password = env_or_default("FIRST_ADMIN_PASSWORD", "");
        let open_registration = env_optional("ADMIN_REGISTRATION_OPEN")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);

        let log_level = env_or_default("EXAMHALL_LOG_LEVEL", "info");
        let json = env_optional("EXAMHALL_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_prefix },
            security: SecuritySettings {
                admin: admin_token,
                teacher: teacher_token,
                student: student_token,
                algorithm,
            },
            session: SessionCookieSettings {
                name: cookie_name,
                path: cookie_path,
                secure: cookie_secure,
                same_site: cookie_same_site,
            },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            admin: AdminSettings { first_admin_email, first_admin_password, open_registration },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn session(&self) -> &SessionCookieSettings {
        &self.session
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, token) in [
            ("ADMIN_TOKEN_EXPIRE_MINUTES", &self.security.admin),
            ("TEACHER_TOKEN_EXPIRE_MINUTES", &self.security.teacher),
            ("STUDENT_TOKEN_EXPIRE_MINUTES", &self.security.student),
        ] {
            if token.expire_minutes == 0 {
                return Err(ConfigError::InvalidValue { field, value: "0".to_string() });
            }
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        // Browsers drop SameSite=None cookies that are not Secure.
        if self.session.same_site == SameSite::None && !self.session.secure {
            return Err(ConfigError::InvalidValue {
                field: "SESSION_COOKIE_SECURE",
                value: "false".to_string(),
            });
        }
        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if !self.admin.first_admin_email.is_empty() && self.admin.first_admin_password.is_empty() {
            return Err(ConfigError::MissingSecret("FIRST_ADMIN_PASSWORD"));
        }

        Ok(())
    }
}

fn token_settings(
    secret_var: &'static str,
    expire_var: &'static str,
    fallback_secret: &str,
    default_expire: u64,
) -> Result<TokenSettings, ConfigError> {
    let secret_key = env_optional(secret_var).unwrap_or_else(|| fallback_secret.to_string());
    let expire_minutes = match env_optional(expire_var) {
        Some(value) => parse_u64(expire_var, value)?,
        None => default_expire,
    };

    Ok(TokenSettings { secret_key, expire_minutes })
}
