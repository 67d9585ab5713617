// Idle wait between dispatch rounds
//
// WFI parks the core until any interrupt is pending, masked or not.
// Off-target (host builds, tests) it degrades to a spin hint so the
// loop simply re-polls.

#[inline]
pub fn wait_for_interrupt() {
    #[cfg(any(target_arch = "riscv32", target_arch = "arm"))]
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack));
    }

    #[cfg(not(any(target_arch = "riscv32", target_arch = "arm")))]
    {
        core::hint::spin_loop();
    }
}
