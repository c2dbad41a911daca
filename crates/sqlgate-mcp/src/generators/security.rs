//! Database principals and their permissions.

use super::{GenerationError, required};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

const LIST_USERS: &str = "\
SELECT
  name AS UserName,
  type_desc AS UserType,
  authentication_type_desc AS AuthenticationType,
  default_schema_name AS DefaultSchema,
  create_date,
  modify_date,
  is_fixed_role
FROM sys.database_principals
WHERE type IN ('S', 'U', 'G')
ORDER BY name";

const LIST_ROLES: &str = "\
SELECT
  name AS RoleName,
  type_desc AS RoleType,
  is_fixed_role AS IsFixedRole
FROM sys.database_principals
WHERE type = 'R'
ORDER BY name";

const USER_PERMISSIONS: &str = "\
SELECT
  p.permission_name,
  p.permission_state_desc AS PermissionState,
  p.class_desc AS ObjectClass,
  OBJECT_SCHEMA_NAME(p.major_id) AS SchemaName,
  OBJECT_NAME(p.major_id) AS ObjectName
FROM sys.database_permissions p
LEFT JOIN sys.database_principals pr ON p.grantee_principal_id = pr.principal_id
WHERE pr.name = @userName
ORDER BY p.permission_name, p.class_desc";

pub fn list_users(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(LIST_USERS))
}

pub fn list_roles(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(LIST_ROLES))
}

pub fn get_user_permissions(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let user = required(args, "userName")?;
    Ok(SqlStatement::new(USER_PERMISSIONS).with_parameter("userName", user))
}
