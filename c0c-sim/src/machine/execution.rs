use super::Machine;
use crate::constants::TEXT_BASE;
use crate::error::SimError;
use c0c_codegen::{Address, AsmInst, Reg};

impl<'p> Machine<'p> {
    fn effective_address(&self, addr: &Address) -> Result<u32, SimError> {
        Ok(match addr {
            Address::Label(label) => self.data_address(label)?,
            Address::Offset(offset, base) => (self.reg(*base) as u32).wrapping_add(*offset as u32),
            Address::Indexed(label, index) => self
                .data_address(label)?
                .wrapping_add(self.reg(*index) as u32),
        })
    }

    fn jump(&mut self, label: &str) -> Result<(), SimError> {
        self.pc = self.text_index(label)?;
        Ok(())
    }

    fn branch(&mut self, taken: bool, label: &str) -> Result<(), SimError> {
        if taken {
            self.jump(label)?;
        }
        Ok(())
    }

    pub(super) fn execute(&mut self, inst: &AsmInst, line: usize) -> Result<(), SimError> {
        match inst {
            AsmInst::Li(rd, imm) => self.set_reg(*rd, *imm),
            AsmInst::La(rd, label) => {
                let addr = self.data_address(label)?;
                self.set_reg(*rd, addr as i32);
            }
            AsmInst::Lw(rt, addr) => {
                let addr = self.effective_address(addr)?;
                let value = self.memory.read_word(addr)?;
                self.set_reg(*rt, value);
            }
            AsmInst::Sw(rt, addr) => {
                let addr = self.effective_address(addr)?;
                self.memory.write_word(addr, self.reg(*rt))?;
            }
            AsmInst::Move(rd, rs) => self.set_reg(*rd, self.reg(*rs)),
            AsmInst::Addu(rd, rs, rt) => self.set_reg(*rd, self.reg(*rs).wrapping_add(self.reg(*rt))),
            AsmInst::Subu(rd, rs, rt) => self.set_reg(*rd, self.reg(*rs).wrapping_sub(self.reg(*rt))),
            AsmInst::Mul(rd, rs, rt) => self.set_reg(*rd, self.reg(*rs).wrapping_mul(self.reg(*rt))),
            AsmInst::Div(rs, rt) => {
                let (a, b) = (self.reg(*rs), self.reg(*rt));
                if b == 0 {
                    return Err(SimError::DivisionByZero(line));
                }
                self.lo = a.wrapping_div(b);
                self.hi = a.wrapping_rem(b);
            }
            AsmInst::Mflo(rd) => self.set_reg(*rd, self.lo),
            AsmInst::Addiu(rt, rs, imm) => self.set_reg(*rt, self.reg(*rs).wrapping_add(*imm)),
            AsmInst::Sll(rd, rt, shamt) => {
                self.set_reg(*rd, ((self.reg(*rt) as u32) << (*shamt as u32 & 31)) as i32)
            }
            AsmInst::J(label) => self.jump(label)?,
            AsmInst::Jal(label) => {
                let ret = TEXT_BASE.wrapping_add(4 * self.pc as u32);
                self.set_reg(Reg::Ra, ret as i32);
                self.jump(label)?;
            }
            AsmInst::Jr(rs) => {
                let addr = self.reg(*rs) as u32;
                let offset = addr.wrapping_sub(TEXT_BASE);
                let index = (offset / 4) as usize;
                if addr < TEXT_BASE || offset % 4 != 0 || index > self.text.len() {
                    return Err(SimError::InvalidJump(addr));
                }
                self.pc = index;
            }
            AsmInst::Beq(rs, rt, l) => self.branch(self.reg(*rs) == self.reg(*rt), l)?,
            AsmInst::Bne(rs, rt, l) => self.branch(self.reg(*rs) != self.reg(*rt), l)?,
            AsmInst::Blt(rs, rt, l) => self.branch(self.reg(*rs) < self.reg(*rt), l)?,
            AsmInst::Bge(rs, rt, l) => self.branch(self.reg(*rs) >= self.reg(*rt), l)?,
            AsmInst::Bgt(rs, rt, l) => self.branch(self.reg(*rs) > self.reg(*rt), l)?,
            AsmInst::Ble(rs, rt, l) => self.branch(self.reg(*rs) <= self.reg(*rt), l)?,
            AsmInst::Beqz(rs, l) => self.branch(self.reg(*rs) == 0, l)?,
            AsmInst::Bnez(rs, l) => self.branch(self.reg(*rs) != 0, l)?,
            AsmInst::Syscall => self.syscall()?,
            AsmInst::Label(_) | AsmInst::Comment(_) => {}
        }
        Ok(())
    }
}
