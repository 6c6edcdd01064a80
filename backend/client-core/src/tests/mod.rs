mod access_token;
mod backend_handle;
mod codec;
mod memory_backend;

use sm_models::OrganizationId;

use uuid::Uuid;

/// Well-formed machine-account token (version 0).
pub(crate) const TEST_ACCESS_TOKEN: &str = "0.ec2c1d46-6a4b-4751-a310-af9601317f2d.C2IgxjjLF7qSshsbwe8JGcbM075YXw:X8vbvA0bduihIDe/qrzIQQ==";

pub(crate) const TEST_SERVICE_ACCOUNT_ID: &str = "ec2c1d46-6a4b-4751-a310-af9601317f2d";

pub(crate) fn test_organization() -> OrganizationId {
    OrganizationId::from_uuid(Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888))
}
