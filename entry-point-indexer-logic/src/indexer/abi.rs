use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct UserOperation {
        address sender;
        uint256 nonce;
        bytes initCode;
        bytes callData;
        uint256 callGasLimit;
        uint256 verificationGasLimit;
        uint256 preVerificationGas;
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
        bytes paymasterAndData;
        bytes signature;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct UserOpsPerAggregator {
        UserOperation[] userOps;
        address aggregator;
        bytes signature;
    }

    interface IEntryPoint {
        #[derive(Debug, PartialEq, Eq)]
        function handleOps(UserOperation[] calldata ops, address payable beneficiary);

        #[derive(Debug, PartialEq, Eq)]
        function handleAggregatedOps(
            UserOpsPerAggregator[] calldata opsPerAggregator,
            address payable beneficiary
        );

        #[derive(Debug, PartialEq, Eq)]
        event UserOperationEvent(
            bytes32 indexed userOpHash,
            address indexed sender,
            address indexed paymaster,
            uint256 nonce,
            bool success,
            uint256 actualGasCost,
            uint256 actualGasUsed
        );

        #[derive(Debug, PartialEq, Eq)]
        event AccountDeployed(
            bytes32 indexed userOpHash,
            address indexed sender,
            address factory,
            address paymaster
        );

        #[derive(Debug, PartialEq, Eq)]
        event UserOperationRevertReason(
            bytes32 indexed userOpHash,
            address indexed sender,
            uint256 nonce,
            bytes revertReason
        );
    }
}
